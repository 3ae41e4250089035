use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use regs_qa::api::{create_generator_router, GeneratorState};
use regs_qa::application::GenerationService;
use regs_qa::infrastructure::{build_llm, load_prompts, telemetry, GeneratorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("generator=debug,regs_qa=debug,tower_http=debug");

    let config = GeneratorConfig::from_env()?;
    let prompts = load_prompts(config.prompts_path.as_deref())?;
    let llm = build_llm(&config.llm);

    let service = GenerationService::new(llm, Arc::new(prompts))
        .with_timeout(Duration::from_secs(config.llm.timeout_seconds));
    info!(
        provider = ?config.llm.provider,
        model = %config.llm.model,
        prompt = %service.prompt_version(),
        "completion provider initialized"
    );
    let app = create_generator_router(GeneratorState::new(Arc::new(service)));

    let addr = config.server.socket_addr();
    info!("Generator listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    Ok(())
}
