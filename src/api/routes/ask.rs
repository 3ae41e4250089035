use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::REQUEST_ID_HEADER;
use crate::api::state::GatewayState;
use crate::application::GatewayError;
use crate::domain::AnswerResult;

#[derive(Debug, Deserialize)]
pub struct AskParams {
    pub query: Option<String>,
}

pub async fn ask_get(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    params: Result<Query<AskParams>, QueryRejection>,
) -> Result<Json<AnswerResult>, GatewayError> {
    let Query(params) = params.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    state
        .pipeline
        .ask_as(request_id(&headers), params.query.as_deref())
        .await
        .map(Json)
}

pub async fn ask_post(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Result<Json<AskParams>, JsonRejection>,
) -> Result<Json<AnswerResult>, GatewayError> {
    let Json(params) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    state
        .pipeline
        .ask_as(request_id(&headers), params.query.as_deref())
        .await
        .map(Json)
}

/// The id set by the request logger, so pipeline logs line up with the access log.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
