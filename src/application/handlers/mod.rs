pub mod prediction_handler;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::services::prediction_service::PredictionService;

/// HTTP routes. `/predict/` and `/history/` are aliases for browser clients
/// that append a trailing slash.
pub fn routes(service: PredictionService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(prediction_handler::home))
        .route("/predict", get(prediction_handler::predict))
        .route("/predict/", get(prediction_handler::predict))
        .route("/history", get(prediction_handler::history))
        .route("/history/", get(prediction_handler::history))
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
