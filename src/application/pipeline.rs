use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;
use uuid::Uuid;

use crate::application::retry::{call_with_retry, RetryPolicy};
use crate::domain::{
    ports::{Generator, Retriever},
    AnswerResult, Dependency, DependencyError, EvidenceSet, Question,
};

/// Lifecycle of one gateway request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskState {
    Received,
    Retrieving,
    Generating,
    Completed,
    Failed,
}

impl AskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Failure kinds a gateway caller can observe.
///
/// Provider details never travel inside these values; they are logged at the
/// point of translation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0} service is unavailable")]
    DependencyUnavailable(Dependency),

    #[error("{0} service did not respond in time")]
    DependencyTimeout(Dependency),

    #[error("too many requests in flight")]
    Overloaded,

    #[error("internal error")]
    Internal,
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::DependencyUnavailable(_) => "dependency_unavailable",
            Self::DependencyTimeout(_) => "dependency_timeout",
            Self::Overloaded => "overloaded",
            Self::Internal => "internal_error",
        }
    }

    pub fn dependency(&self) -> Option<Dependency> {
        match self {
            Self::DependencyUnavailable(dep) | Self::DependencyTimeout(dep) => Some(*dep),
            _ => None,
        }
    }
}

impl From<&DependencyError> for GatewayError {
    fn from(e: &DependencyError) -> Self {
        match e {
            DependencyError::Unreachable(dep, _) => Self::DependencyUnavailable(*dep),
            DependencyError::Timeout(dep, _) => Self::DependencyTimeout(*dep),
            DependencyError::RetrievalUnavailable(_) => {
                Self::DependencyUnavailable(Dependency::Retriever)
            }
            DependencyError::GenerationFailed(_) => {
                Self::DependencyUnavailable(Dependency::Generator)
            }
            DependencyError::Rejected(..) | DependencyError::Protocol(..) => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelinePolicy {
    pub top_k: usize,
    pub retriever: RetryPolicy,
    pub generator: RetryPolicy,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            top_k: 5,
            retriever: RetryPolicy::no_retry(Duration::from_secs(20)),
            generator: RetryPolicy::no_retry(Duration::from_secs(65)),
        }
    }
}

/// State trace of a single request.
#[derive(Debug, Clone)]
pub struct AskRun {
    request_id: String,
    history: Vec<AskState>,
}

impl AskRun {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            history: vec![AskState::Received],
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn state(&self) -> AskState {
        self.history.last().copied().unwrap_or(AskState::Received)
    }

    pub fn history(&self) -> &[AskState] {
        &self.history
    }

    fn advance(&mut self, next: AskState) {
        let from = self.state();
        debug_assert!(!from.is_terminal(), "transition out of terminal state {from:?}");
        tracing::debug!(from = ?from, to = ?next, "state transition");
        self.history.push(next);
    }
}

/// Drives `Received → Retrieving → Generating → Completed` for each question.
pub struct AskPipeline {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    policy: PipelinePolicy,
}

impl AskPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
        policy: PipelinePolicy,
    ) -> Self {
        Self {
            retriever,
            generator,
            policy,
        }
    }

    pub fn policy(&self) -> &PipelinePolicy {
        &self.policy
    }

    pub async fn ask(&self, query: Option<&str>) -> Result<AnswerResult, GatewayError> {
        self.run(query).await.1
    }

    /// Answers under a caller-supplied request id, usually the `x-request-id`
    /// of the HTTP request.
    pub async fn ask_as(
        &self,
        request_id: String,
        query: Option<&str>,
    ) -> Result<AnswerResult, GatewayError> {
        self.run_as(request_id, query).await.1
    }

    /// Same as [`ask`](Self::ask) but also hands back the state trace.
    pub async fn run(&self, query: Option<&str>) -> (AskRun, Result<AnswerResult, GatewayError>) {
        self.run_as(Uuid::new_v4().to_string(), query).await
    }

    #[instrument(skip(self, query))]
    pub async fn run_as(
        &self,
        request_id: String,
        query: Option<&str>,
    ) -> (AskRun, Result<AnswerResult, GatewayError>) {
        let mut run = AskRun::new(request_id);

        let result = self.drive(&mut run, query).await;
        match &result {
            Ok(answer) => {
                tracing::info!(
                    request_id = %run.request_id,
                    sources = answer.sources.len(),
                    "question answered"
                );
            }
            Err(e) => {
                run.advance(AskState::Failed);
                tracing::warn!(
                    request_id = %run.request_id,
                    kind = e.kind(),
                    error = %e,
                    "question failed"
                );
            }
        }

        (run, result)
    }

    async fn drive(
        &self,
        run: &mut AskRun,
        query: Option<&str>,
    ) -> Result<AnswerResult, GatewayError> {
        let question = Self::receive(query)?;

        run.advance(AskState::Retrieving);
        let evidence = self.retrieve(&question).await?;
        let contexts = Self::assemble(&evidence);

        run.advance(AskState::Generating);
        let answer = self.generate(&question, &contexts).await?;

        run.advance(AskState::Completed);
        Ok(Self::complete(question, answer, &evidence))
    }

    pub fn receive(query: Option<&str>) -> Result<Question, GatewayError> {
        Question::parse(query).map_err(|e| GatewayError::InvalidRequest(e.to_string()))
    }

    pub async fn retrieve(&self, question: &Question) -> Result<EvidenceSet, GatewayError> {
        let query = question.as_str();
        let top_k = self.policy.top_k;

        call_with_retry(Dependency::Retriever, &self.policy.retriever, || {
            self.retriever.search(query, top_k)
        })
        .await
        .map_err(|e| Self::translate(&e))
    }

    /// Evidence texts in rank order, one context per item.
    pub fn assemble(evidence: &EvidenceSet) -> Vec<String> {
        evidence.iter().map(|item| item.content.clone()).collect()
    }

    pub async fn generate(
        &self,
        question: &Question,
        contexts: &[String],
    ) -> Result<String, GatewayError> {
        let query = question.as_str();

        call_with_retry(Dependency::Generator, &self.policy.generator, || {
            self.generator.generate(query, contexts)
        })
        .await
        .map_err(|e| Self::translate(&e))
    }

    pub fn complete(question: Question, answer: String, evidence: &EvidenceSet) -> AnswerResult {
        AnswerResult::new(question, answer, evidence)
    }

    fn translate(e: &DependencyError) -> GatewayError {
        let translated = GatewayError::from(e);
        if translated == GatewayError::Internal {
            tracing::error!(dependency = %e.dependency(), error = %e, "unexpected downstream response");
        } else {
            tracing::warn!(dependency = %e.dependency(), error = %e, "downstream call failed");
        }
        translated
    }
}
