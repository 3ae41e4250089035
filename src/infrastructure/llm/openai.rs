use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai;

use crate::domain::{ports::LlmService, DomainError};

/// OpenAI chat completions via rig. Reads `OPENAI_API_KEY`.
pub struct OpenAiLlm {
    client: openai::Client,
    model: String,
    max_tokens: u64,
}

impl OpenAiLlm {
    pub fn new(model: impl Into<String>, max_tokens: u64) -> Self {
        Self {
            client: openai::Client::from_env(),
            model: model.into(),
            max_tokens,
        }
    }
}

#[async_trait]
impl LlmService for OpenAiLlm {
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
            .temperature(0.0)
            .build();
        agent
            .prompt(prompt)
            .await
            .map_err(|e| DomainError::external(e.to_string()))
    }
}
