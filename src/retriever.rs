use std::sync::Arc;

use tracing::info;

use regs_qa::api::{create_retriever_router, RetrieverState};
use regs_qa::application::RetrievalService;
use regs_qa::infrastructure::{telemetry, QdrantVectorStore, RetrieverConfig, TextEmbedding};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("retriever=debug,regs_qa=debug,tower_http=debug");

    let config = RetrieverConfig::from_env()?;

    let embedding = Arc::new(TextEmbedding::from_config(&config.embedding));
    let vector_store =
        Arc::new(QdrantVectorStore::connect(&config.qdrant_url, &config.collection).await?);
    info!(
        qdrant = %config.qdrant_url,
        collection = %config.collection,
        model = %config.embedding.model,
        "retrieval backends initialized"
    );

    let service = RetrievalService::new(embedding, vector_store, config.default_k)
        .with_max_top_k(config.max_k);
    let app = create_retriever_router(RetrieverState::new(Arc::new(service)));

    let addr = config.server.socket_addr();
    info!("Retriever listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    Ok(())
}
