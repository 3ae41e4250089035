use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a provider adapter (embedding, vector store, completion).
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

/// Downstream service the gateway depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependency {
    Retriever,
    Generator,
}

impl Dependency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retriever => "retriever",
            Self::Generator => "generator",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a failed call from the gateway to one of its dependencies.
///
/// Transport problems and service-reported failures are kept apart so the
/// retry policy can tell a flaky link from a provider that refused to answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("{0} unreachable: {1}")]
    Unreachable(Dependency, String),

    #[error("{0} did not answer within {1} ms")]
    Timeout(Dependency, u64),

    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("{0} rejected the request: {1}")]
    Rejected(Dependency, String),

    #[error("{0} sent a malformed response: {1}")]
    Protocol(Dependency, String),
}

impl DependencyError {
    pub fn dependency(&self) -> Dependency {
        match self {
            Self::Unreachable(dep, _)
            | Self::Timeout(dep, _)
            | Self::Rejected(dep, _)
            | Self::Protocol(dep, _) => *dep,
            Self::RetrievalUnavailable(_) => Dependency::Retriever,
            Self::GenerationFailed(_) => Dependency::Generator,
        }
    }

    /// Only infrastructure-level outcomes are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unreachable(..) | Self::Timeout(..) | Self::RetrievalUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_is_never_retryable() {
        assert!(!DependencyError::GenerationFailed("rate limited".into()).is_retryable());
        assert!(!DependencyError::Rejected(Dependency::Generator, "bad".into()).is_retryable());
        assert!(!DependencyError::Protocol(Dependency::Retriever, "eof".into()).is_retryable());
    }

    #[test]
    fn test_infrastructure_failures_are_retryable() {
        assert!(DependencyError::Timeout(Dependency::Retriever, 100).is_retryable());
        assert!(DependencyError::Unreachable(Dependency::Generator, "refused".into()).is_retryable());
        assert!(DependencyError::RetrievalUnavailable("qdrant down".into()).is_retryable());
    }

    #[test]
    fn test_dependency_attribution() {
        assert_eq!(
            DependencyError::RetrievalUnavailable(String::new()).dependency(),
            Dependency::Retriever
        );
        assert_eq!(
            DependencyError::GenerationFailed(String::new()).dependency(),
            Dependency::Generator
        );
        assert_eq!(Dependency::Generator.to_string(), "generator");
    }
}
