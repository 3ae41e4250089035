pub mod contract;
mod generator_client;
mod retriever_client;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Response, StatusCode};

pub use generator_client::HttpGeneratorClient;
pub use retriever_client::HttpRetrieverClient;

use crate::domain::{Dependency, DependencyError};
use crate::infrastructure::config::GatewayConfig;
use contract::{kinds, ErrorBody};

/// Long-lived clients for the gateway's two dependencies. Built once at
/// startup and released through [`Downstreams::shutdown`].
pub struct Downstreams {
    pub retriever: Arc<HttpRetrieverClient>,
    pub generator: Arc<HttpGeneratorClient>,
}

impl Downstreams {
    pub fn connect(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        tracing::info!(url = %config.retriever_url, "retriever client ready");
        tracing::info!(url = %config.generator_url, "generator client ready");

        Ok(Self {
            retriever: Arc::new(
                HttpRetrieverClient::new(http.clone(), &config.retriever_url)
                    .with_health_timeout(config.health_timeout),
            ),
            generator: Arc::new(
                HttpGeneratorClient::new(http, &config.generator_url)
                    .with_health_timeout(config.health_timeout),
            ),
        })
    }

    /// Drops the gateway's handles; pooled connections close once the last
    /// in-flight request releases its clone.
    pub fn shutdown(self) {
        drop(self.retriever);
        drop(self.generator);
        tracing::info!("downstream clients released");
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn transport_error(dependency: Dependency, e: reqwest::Error) -> DependencyError {
    DependencyError::Unreachable(dependency, e.to_string())
}

/// Maps a non-2xx response to the matching failure, preferring the error kind
/// the service reported over the bare status code.
async fn read_failure(dependency: Dependency, response: Response) -> DependencyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let reported = serde_json::from_str::<ErrorBody>(&body).ok().map(|b| b.error);
    let detail = reported
        .as_ref()
        .map(|e| e.detail.clone())
        .unwrap_or_else(|| format!("HTTP {status}"));

    match reported.as_ref().map(|e| e.kind.as_str()) {
        Some(kinds::RETRIEVAL_UNAVAILABLE) => DependencyError::RetrievalUnavailable(detail),
        Some(kinds::GENERATION_FAILED) => DependencyError::GenerationFailed(detail),
        Some(kinds::INVALID_REQUEST) => DependencyError::Rejected(dependency, detail),
        _ if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS => {
            DependencyError::Unreachable(dependency, detail)
        }
        _ => DependencyError::Rejected(dependency, detail),
    }
}

/// Deadline for a single liveness probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

async fn health(http: &reqwest::Client, base_url: &str, timeout: Duration) -> bool {
    match http
        .get(endpoint(base_url, "health"))
        .timeout(timeout)
        .send()
        .await
    {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}
