use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{
    ports::VectorStore, DomainError, Embedding, EvidenceItem, ScoredEvidence,
};

/// Brute-force cosine search over a fixed set of items. Used for local runs
/// and tests; production retrieval goes through Qdrant.
pub struct InMemoryVectorStore {
    items: RwLock<Vec<(EvidenceItem, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, item: EvidenceItem, embedding: Embedding) -> Result<(), DomainError> {
        self.items
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?
            .push((item, embedding));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<ScoredEvidence>, DomainError> {
        let items = self
            .items
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut results: Vec<ScoredEvidence> = items
            .iter()
            .map(|(item, embedding)| ScoredEvidence {
                item: item.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }
}
