use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::api::state::RetrieverState;
use crate::application::RetrievalError;
use crate::infrastructure::rpc::contract::{Document, SearchRequest, SearchResponse};

pub async fn search(
    State(state): State<RetrieverState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, RetrievalError> {
    let Json(request) = body.map_err(|e| RetrievalError::InvalidQuery(e.body_text()))?;

    let evidence = state
        .service
        .search(&request.query, request.k)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "search failed"))?;

    Ok(Json(SearchResponse {
        documents: evidence.into_iter().map(Document::from).collect(),
    }))
}
