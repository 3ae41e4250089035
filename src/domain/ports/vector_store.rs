use crate::domain::{errors::DomainError, Embedding, ScoredEvidence};
use async_trait::async_trait;

/// Similarity-search provider. Results come back best match first.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<ScoredEvidence>, DomainError>;
}
