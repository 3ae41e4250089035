use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingModel;
use rig::providers::openai;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// OpenAI embeddings through rig. The client reads `OPENAI_API_KEY`, which
/// the retriever config requires at startup.
pub struct TextEmbedding {
    client: openai::Client,
    model: String,
    dimension: usize,
}

impl TextEmbedding {
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            client: openai::Client::from_env(),
            model: config.model.clone(),
            dimension: config.dimension,
        }
    }
}

#[async_trait]
impl EmbeddingService for TextEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let model = self.client.embedding_model(&self.model);

        let embedding = model
            .embed_text(text)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let embedding = Embedding::from_f64(embedding.vec);
        if embedding.dimension() != self.dimension {
            return Err(DomainError::internal(format!(
                "embedding model {} returned {} dimensions, expected {}",
                self.model,
                embedding.dimension(),
                self.dimension
            )));
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
