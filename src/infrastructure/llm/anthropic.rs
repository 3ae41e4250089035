use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::anthropic;

use crate::domain::{ports::LlmService, DomainError};

/// Anthropic messages API via rig. Reads `ANTHROPIC_API_KEY`.
pub struct AnthropicLlm {
    client: anthropic::Client,
    model: String,
    max_tokens: u64,
}

impl AnthropicLlm {
    pub fn new(model: impl Into<String>, max_tokens: u64) -> Self {
        Self {
            client: anthropic::Client::from_env(),
            model: model.into(),
            max_tokens,
        }
    }
}

#[async_trait]
impl LlmService for AnthropicLlm {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(system)
            .max_tokens(self.max_tokens)
            .build();
        agent
            .prompt(prompt)
            .await
            .map_err(|e| DomainError::external(e.to_string()))
    }
}
