use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    EvidenceSet,
};

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Invalid search request: {0}")]
    InvalidQuery(String),
    #[error("Retrieval unavailable: {0}")]
    Unavailable(String),
}

/// Looks up evidence for a query through the embedding and vector-store ports.
pub struct RetrievalService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    default_top_k: usize,
    max_top_k: usize,
}

impl RetrievalService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            default_top_k,
            max_top_k: default_top_k.max(50),
        }
    }

    pub fn with_max_top_k(mut self, max_top_k: usize) -> Self {
        self.max_top_k = max_top_k.max(1);
        self
    }

    /// Top-`k` evidence, best match first. An empty set means the index had no
    /// hits; provider failures surface as [`RetrievalError::Unavailable`].
    #[instrument(skip(self, top_k), fields(k))]
    pub async fn search(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<EvidenceSet, RetrievalError> {
        if query.trim().is_empty() {
            return Err(RetrievalError::InvalidQuery("query must not be empty".into()));
        }

        let top_k = match top_k {
            Some(0) => {
                return Err(RetrievalError::InvalidQuery("k must be positive".into()));
            }
            Some(k) => k.min(self.max_top_k),
            None => self.default_top_k,
        };
        tracing::Span::current().record("k", top_k);

        let embedding = self
            .embedding
            .embed(query)
            .await
            .map_err(|e| RetrievalError::Unavailable(format!("embedding failed: {e}")))?;

        let hits = self
            .vector_store
            .search(&embedding, top_k)
            .await
            .map_err(|e| RetrievalError::Unavailable(format!("vector search failed: {e}")))?;

        tracing::debug!(
            hits = hits.len(),
            scores = ?hits.iter().map(|h| h.score).collect::<Vec<_>>(),
            "search completed"
        );

        Ok(hits.into_iter().take(top_k).map(|hit| hit.item).collect())
    }
}
