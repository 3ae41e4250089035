use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{GatewayError, GenerationError, RetrievalError};
use crate::infrastructure::rpc::contract::{kinds, ErrorBody};

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::DependencyUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::DependencyTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let mut body = ErrorBody::new(self.kind(), self.to_string());
        if let Some(dependency) = self.dependency() {
            body = body.with_dependency(dependency);
        }
        (self.status(), Json(body)).into_response()
    }
}

impl IntoResponse for RetrievalError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            Self::InvalidQuery(_) => (StatusCode::BAD_REQUEST, kinds::INVALID_REQUEST),
            Self::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, kinds::RETRIEVAL_UNAVAILABLE),
        };
        let detail = match self {
            Self::InvalidQuery(detail) | Self::Unavailable(detail) => detail,
        };
        (status, Json(ErrorBody::new(kind, detail))).into_response()
    }
}

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            Self::InvalidQuery(_) => (StatusCode::BAD_REQUEST, kinds::INVALID_REQUEST),
            Self::Failed(_) => (StatusCode::BAD_GATEWAY, kinds::GENERATION_FAILED),
        };
        let detail = match self {
            Self::InvalidQuery(detail) | Self::Failed(detail) => detail,
        };
        (status, Json(ErrorBody::new(kind, detail))).into_response()
    }
}
