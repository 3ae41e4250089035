use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, EvidenceItem, Provenance};

/// A caller's question that passed the emptiness check.
///
/// The text is kept exactly as submitted; trimming only decides validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw {
            Some(text) if !text.trim().is_empty() => Ok(Self(text.to_string())),
            Some(_) => Err(DomainError::validation("query must not be empty")),
            None => Err(DomainError::validation("query is required")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Final answer returned to the caller, citations in evidence rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question: String,
    pub answer: String,
    pub sources: Vec<Provenance>,
}

impl AnswerResult {
    pub fn new(question: Question, answer: impl Into<String>, evidence: &[EvidenceItem]) -> Self {
        Self {
            question: question.into_inner(),
            answer: answer.into(),
            sources: evidence.iter().map(|e| e.provenance.clone()).collect(),
        }
    }
}
