pub mod curl;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::executor::CurlService;

pub type SharedService = Arc<dyn CurlService>;

/// Builds the API router around `service`.
pub fn router(service: SharedService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/curl/parse", post(curl::parse_command))
        .route("/api/curl/execute", post(curl::execute_command))
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
