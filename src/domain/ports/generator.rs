use async_trait::async_trait;

use crate::domain::DependencyError;

/// Gateway-side view of the generation service.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, query: &str, contexts: &[String]) -> Result<String, DependencyError>;
}
