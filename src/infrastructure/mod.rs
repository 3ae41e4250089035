pub mod config;
pub mod embedding;
pub mod llm;
pub mod prompts;
pub mod rpc;
pub mod telemetry;
pub mod vector_store;

pub use config::{ConfigError, GatewayConfig, GeneratorConfig, RetrieverConfig};
pub use embedding::TextEmbedding;
pub use llm::{build_llm, AnthropicLlm, OpenAiLlm};
pub use prompts::load_prompts;
pub use rpc::{Downstreams, HttpGeneratorClient, HttpRetrieverClient};
pub use vector_store::{InMemoryVectorStore, QdrantVectorStore};
