mod anthropic;
mod openai;

use std::sync::Arc;

pub use anthropic::AnthropicLlm;
pub use openai::OpenAiLlm;

use crate::domain::ports::LlmService;
use crate::infrastructure::config::{LlmConfig, LlmProvider};

pub fn build_llm(config: &LlmConfig) -> Arc<dyn LlmService> {
    match config.provider {
        LlmProvider::OpenAi => Arc::new(OpenAiLlm::new(&config.model, config.max_tokens)),
        LlmProvider::Anthropic => Arc::new(AnthropicLlm::new(&config.model, config.max_tokens)),
    }
}
