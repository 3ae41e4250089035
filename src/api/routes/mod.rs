pub mod ask;
pub mod generate;
pub mod health;
pub mod search;

use axum::http::{header, Method};
use axum::{middleware, routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::middleware::{admission_control, request_logger};
use crate::api::state::{GatewayState, GeneratorState, RetrieverState};

pub fn create_gateway_router(state: GatewayState) -> Router {
    let cors = build_cors(&state.cors_allowed_origins);

    let ask_routes = Router::new()
        .route("/ask", get(ask::ask_get).post(ask::ask_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admission_control,
        ));

    Router::new()
        .route("/health", get(health::gateway_health))
        .route("/ready", get(health::readiness_check))
        .merge(ask_routes)
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub fn create_retriever_router(state: RetrieverState) -> Router {
    Router::new()
        .route("/health", get(health::retriever_health))
        .route("/search", post(search::search))
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_generator_router(state: GeneratorState) -> Router {
    Router::new()
        .route("/health", get(health::generator_health))
        .route("/generate", post(generate::generate))
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}
