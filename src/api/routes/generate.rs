use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::api::state::GeneratorState;
use crate::application::GenerationError;
use crate::infrastructure::rpc::contract::{GenerateRequest, GenerateResponse};

pub async fn generate(
    State(state): State<GeneratorState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, GenerationError> {
    let Json(request) = body.map_err(|e| GenerationError::InvalidQuery(e.body_text()))?;

    let answer = state
        .service
        .generate(&request.query, &request.contexts)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "generation failed"))?;

    Ok(Json(GenerateResponse { answer }))
}
