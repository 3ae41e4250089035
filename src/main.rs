use std::sync::Arc;

use tracing::info;

use regs_qa::api::{create_gateway_router, GatewayState};
use regs_qa::application::AskPipeline;
use regs_qa::domain::Dependency;
use regs_qa::infrastructure::{telemetry, Downstreams, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("gateway=debug,regs_qa=debug,tower_http=debug");

    let config = GatewayConfig::from_env()?;
    let downstreams = Downstreams::connect(&config)?;
    info!(
        retriever = %config.retriever_url,
        generator = %config.generator_url,
        "downstream clients initialized"
    );

    let pipeline = Arc::new(AskPipeline::new(
        downstreams.retriever.clone(),
        downstreams.generator.clone(),
        config.pipeline_policy(),
    ));

    let state = GatewayState::new(pipeline, config.max_in_flight)
        .with_admission_wait(config.admission_wait)
        .with_probe(Dependency::Retriever, downstreams.retriever.clone())
        .with_probe(Dependency::Generator, downstreams.generator.clone())
        .with_cors_origins(config.cors_allowed_origins.clone());
    let app = create_gateway_router(state);

    let addr = config.server.socket_addr();
    info!("Gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    downstreams.shutdown();
    Ok(())
}
