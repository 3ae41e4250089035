use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::state::{GatewayState, GeneratorState, RetrieverState};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
}

impl HealthResponse {
    fn running(service: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            status: "running".into(),
            service: service.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            started_at,
        }
    }
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub dependencies: BTreeMap<String, String>,
}

pub async fn gateway_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse::running("gateway", state.started_at))
}

pub async fn retriever_health(State(state): State<RetrieverState>) -> Json<HealthResponse> {
    Json(HealthResponse::running("retriever", state.started_at))
}

pub async fn generator_health(State(state): State<GeneratorState>) -> Json<HealthResponse> {
    Json(HealthResponse::running("generator", state.started_at))
}

/// Ready only when every downstream answers its liveness endpoint.
pub async fn readiness_check(
    State(state): State<GatewayState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let checks = join_all(state.probes.iter().map(|(dependency, probe)| async move {
        (dependency.to_string(), probe.is_alive().await)
    }))
    .await;

    let is_ready = checks.iter().all(|(_, alive)| *alive);
    let dependencies = checks
        .into_iter()
        .map(|(name, alive)| (name, if alive { "up" } else { "down" }.to_string()))
        .collect();

    let response = ReadinessResponse {
        status: if is_ready { "ready" } else { "not_ready" }.into(),
        dependencies,
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
