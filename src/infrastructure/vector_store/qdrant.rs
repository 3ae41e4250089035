use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{value::Kind, SearchPointsBuilder, Value};
use qdrant_client::Qdrant;

use crate::domain::{ports::VectorStore, DomainError, Embedding, EvidenceItem, ScoredEvidence};

/// Read-only view of a collection written by the offline indexer.
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
}

impl QdrantVectorStore {
    pub async fn connect(url: &str, collection: &str) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| DomainError::external(e.to_string()))?;

        let store = Self {
            client,
            collection: collection.to_string(),
        };

        match store.client.collection_exists(&store.collection).await {
            Ok(true) => tracing::info!(collection, "qdrant collection found"),
            Ok(false) => tracing::warn!(collection, "qdrant collection does not exist yet"),
            Err(e) => tracing::warn!(collection, error = %e, "qdrant not reachable at startup"),
        }

        Ok(store)
    }
}

/// Converts a point payload into plain JSON so provenance parsing stays
/// independent of the client's wire types.
fn payload_to_json(payload: HashMap<String, Value>) -> serde_json::Value {
    serde_json::Value::Object(
        payload
            .into_iter()
            .map(|(key, value)| (key, value_to_json(value)))
            .collect(),
    )
}

fn value_to_json(value: Value) -> serde_json::Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::from(i),
        Some(Kind::DoubleValue(d)) => serde_json::Value::from(d),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => payload_to_json(s.fields),
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<ScoredEvidence>, DomainError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.as_slice().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(response
            .result
            .into_iter()
            .map(|point| ScoredEvidence {
                item: EvidenceItem::from_payload(&payload_to_json(point.payload)),
                score: point.score,
            })
            .collect())
    }
}
