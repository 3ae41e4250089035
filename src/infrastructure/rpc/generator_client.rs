use std::time::Duration;

use async_trait::async_trait;

use super::contract::{GenerateRequest, GenerateResponse};
use super::{endpoint, health, read_failure, transport_error, HEALTH_TIMEOUT};
use crate::domain::{
    ports::{Generator, HealthProbe},
    Dependency, DependencyError,
};

pub struct HttpGeneratorClient {
    http: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpGeneratorClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            health_timeout: HEALTH_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }
}

#[async_trait]
impl HealthProbe for HttpGeneratorClient {
    async fn is_alive(&self) -> bool {
        health(&self.http, &self.base_url, self.health_timeout).await
    }
}

#[async_trait]
impl Generator for HttpGeneratorClient {
    async fn generate(&self, query: &str, contexts: &[String]) -> Result<String, DependencyError> {
        let request = GenerateRequest {
            query: query.to_string(),
            contexts: contexts.to_vec(),
        };

        let response = self
            .http
            .post(endpoint(&self.base_url, "generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(Dependency::Generator, e))?;

        if !response.status().is_success() {
            return Err(read_failure(Dependency::Generator, response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DependencyError::Protocol(Dependency::Generator, e.to_string()))?;

        Ok(body.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_generate_sends_contexts_in_order() {
        let router = Router::new().route(
            "/generate",
            post(|Json(req): Json<Value>| async move {
                assert_eq!(req["contexts"], json!(["a", "b"]));
                Json(json!({ "answer": format!("answer to {}", req["query"].as_str().unwrap()) }))
            }),
        );
        let base = serve(router).await;
        let client = HttpGeneratorClient::new(reqwest::Client::new(), &base);

        let answer = client.generate("q", &["a".into(), "b".into()]).await.unwrap();
        assert_eq!(answer, "answer to q");
    }

    #[tokio::test]
    async fn test_generation_failure_kind_preserved() {
        let router = Router::new().route(
            "/generate",
            post(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": { "kind": "generation_failed", "detail": "upstream 500" } })),
                )
            }),
        );
        let base = serve(router).await;
        let client = HttpGeneratorClient::new(reqwest::Client::new(), &base);

        let err = client.generate("q", &[]).await.unwrap_err();
        assert_eq!(err, DependencyError::GenerationFailed("upstream 500".into()));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_bare_gateway_error_is_unreachable() {
        let router = Router::new().route(
            "/generate",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream connect error") }),
        );
        let base = serve(router).await;
        let client = HttpGeneratorClient::new(reqwest::Client::new(), &base);

        let err = client.generate("q", &[]).await.unwrap_err();
        assert!(matches!(err, DependencyError::Unreachable(Dependency::Generator, _)));
    }

    #[tokio::test]
    async fn test_liveness_probe_gives_up_after_deadline() {
        let router = Router::new().route(
            "/health",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                "running"
            }),
        );
        let base = serve(router).await;
        let client = HttpGeneratorClient::new(reqwest::Client::new(), &base)
            .with_health_timeout(Duration::from_millis(100));

        let started = std::time::Instant::now();
        assert!(!client.is_alive().await);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
