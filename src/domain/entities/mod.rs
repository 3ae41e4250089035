mod answer;
mod embedding;
mod evidence;
mod prompt;

pub use answer::{AnswerResult, Question};
pub use embedding::Embedding;
pub use evidence::{EvidenceItem, EvidenceSet, Provenance, ScoredEvidence};
pub use prompt::{PromptTemplate, RenderedPrompt};
