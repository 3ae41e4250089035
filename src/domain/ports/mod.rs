mod embedding;
mod generator;
mod health;
mod llm;
mod retriever;
mod vector_store;

pub use embedding::EmbeddingService;
pub use generator::Generator;
pub use health::HealthProbe;
pub use llm::LlmService;
pub use retriever::Retriever;
pub use vector_store::VectorStore;
