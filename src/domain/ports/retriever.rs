use async_trait::async_trait;

use crate::domain::{DependencyError, EvidenceSet};

/// Gateway-side view of the retrieval service.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, query: &str, k: usize) -> Result<EvidenceSet, DependencyError>;
}
