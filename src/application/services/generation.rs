use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::domain::{ports::LlmService, PromptTemplate};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid generation request: {0}")]
    InvalidQuery(String),
    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Produces a grounded answer from a question and the evidence texts.
pub struct GenerationService {
    llm: Arc<dyn LlmService>,
    prompt: Arc<PromptTemplate>,
    timeout: Duration,
}

impl GenerationService {
    pub fn new(llm: Arc<dyn LlmService>, prompt: Arc<PromptTemplate>) -> Self {
        Self {
            llm,
            prompt,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn prompt_version(&self) -> &str {
        &self.prompt.version
    }

    /// Contexts are used exactly as given. Ordering is the caller's concern.
    #[instrument(skip(self, contexts), fields(contexts = contexts.len(), prompt = %self.prompt.version))]
    pub async fn generate(&self, query: &str, contexts: &[String]) -> Result<String, GenerationError> {
        if query.trim().is_empty() {
            return Err(GenerationError::InvalidQuery("query must not be empty".into()));
        }

        let rendered = self.prompt.render(query, contexts);

        let answer = tokio::time::timeout(
            self.timeout,
            self.llm.complete_with_system(&rendered.system, &rendered.user),
        )
        .await
        .map_err(|_| {
            GenerationError::Failed(format!(
                "completion provider timed out after {}s",
                self.timeout.as_secs()
            ))
        })?
        .map_err(|e| GenerationError::Failed(e.to_string()))?;

        tracing::debug!(answer_len = answer.len(), "completion received");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::DomainError;

    #[derive(Default)]
    struct RecordingLlm {
        seen: Mutex<Vec<(String, String)>>,
        reply: String,
    }

    #[async_trait]
    impl LlmService for RecordingLlm {
        async fn complete_with_system(
            &self,
            system: &str,
            prompt: &str,
        ) -> Result<String, DomainError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            Ok(self.reply.clone())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmService for FailingLlm {
        async fn complete_with_system(&self, _: &str, _: &str) -> Result<String, DomainError> {
            Err(DomainError::external("429 Too Many Requests"))
        }
    }

    struct SlowLlm;

    #[async_trait]
    impl LlmService for SlowLlm {
        async fn complete_with_system(&self, _: &str, _: &str) -> Result<String, DomainError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".into())
        }
    }

    fn prompt() -> Arc<PromptTemplate> {
        Arc::new(PromptTemplate {
            version: "test".into(),
            system: "Use only the material.".into(),
            glossary: String::new(),
            user: "{context}\n---\n{question}".into(),
            empty_context: "(none)".into(),
        })
    }

    #[tokio::test]
    async fn test_contexts_joined_in_received_order() {
        let llm = Arc::new(RecordingLlm {
            reply: "140학점 이상 이수. [교과과정(12)]".into(),
            ..Default::default()
        });
        let service = GenerationService::new(llm.clone(), prompt());

        let answer = service
            .generate("졸업 요건은?", &["b".into(), "a".into()])
            .await
            .unwrap();

        assert_eq!(answer, "140학점 이상 이수. [교과과정(12)]");
        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen[0].0, "Use only the material.");
        assert_eq!(seen[0].1, "b\n\na\n---\n졸업 요건은?");
    }

    #[tokio::test]
    async fn test_empty_contexts_still_call_provider() {
        let llm = Arc::new(RecordingLlm {
            reply: "자료 내에서 확인 불가".into(),
            ..Default::default()
        });
        let service = GenerationService::new(llm.clone(), prompt());

        let answer = service.generate("q", &[]).await.unwrap();
        assert_eq!(answer, "자료 내에서 확인 불가");
        assert_eq!(llm.seen.lock().unwrap()[0].1, "(none)\n---\nq");
    }

    #[tokio::test]
    async fn test_provider_error_carries_detail() {
        let service = GenerationService::new(Arc::new(FailingLlm), prompt());
        match service.generate("q", &[]).await {
            Err(GenerationError::Failed(detail)) => assert!(detail.contains("429")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_provider_timeout_is_generation_failure() {
        let service = GenerationService::new(Arc::new(SlowLlm), prompt())
            .with_timeout(Duration::from_millis(20));
        assert!(matches!(
            service.generate("q", &[]).await,
            Err(GenerationError::Failed(_))
        ));
    }
}
