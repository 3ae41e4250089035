use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Text-completion provider.
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete_with_system(&self, system: &str, prompt: &str)
        -> Result<String, DomainError>;
}
