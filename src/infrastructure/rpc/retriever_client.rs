use std::time::Duration;

use async_trait::async_trait;

use super::contract::{SearchRequest, SearchResponse};
use super::{endpoint, health, read_failure, transport_error, HEALTH_TIMEOUT};
use crate::domain::{
    ports::{HealthProbe, Retriever},
    Dependency, DependencyError, EvidenceItem, EvidenceSet,
};

pub struct HttpRetrieverClient {
    http: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpRetrieverClient {
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
impl HealthProbe for HttpRetrieverClient {
    async fn is_alive(&self) -> bool {
        health(&self.http, &self.base_url, self.health_timeout).await
    }
}

#[async_trait]
impl Retriever for HttpRetrieverClient {
    async fn search(&self, query: &str, k: usize) -> Result<EvidenceSet, DependencyError> {
        let request = SearchRequest {
            query: query.to_string(),
            k: Some(k),
        };

        let response = self
            .http
            .post(endpoint(&self.base_url, "search"))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(Dependency::Retriever, e))?;

        if !response.status().is_success() {
            return Err(read_failure(Dependency::Retriever, response).await);
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| DependencyError::Protocol(Dependency::Retriever, e.to_string()))?;

        Ok(body.documents.into_iter().map(EvidenceItem::from).collect())
    }
}
