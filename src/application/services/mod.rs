mod generation;
mod retrieval;

pub use generation::{GenerationError, GenerationService};
pub use retrieval::{RetrievalError, RetrievalService};
