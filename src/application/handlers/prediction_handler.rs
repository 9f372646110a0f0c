use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::services::prediction_service::{PredictionOutcome, PredictionService};
use crate::domain::errors::{ApiError, PredictionError};
use crate::persistence::models::PredictionRecord;

pub const HEALTH_MESSAGE: &str = "Predixa API is running";

/// Query parameters for the predict endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictQuery {
    /// Horizon in days, must be positive
    pub days: i64,
}

/// Static health payload
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        match e {
            PredictionError::InvalidHorizon(_) => ApiError::InvalidRequest(e.to_string()),
            // Cause was logged by the service; the client gets an opaque message
            PredictionError::Internal(_) => {
                ApiError::InternalServerError("Prediction failed".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Health check endpoint
pub async fn home() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
    })
}

/// Predict the price `days` ahead and store the prediction
pub async fn predict(
    State(service): State<PredictionService>,
    Query(params): Query<PredictQuery>,
) -> Result<Json<PredictionOutcome>, ApiError> {
    let outcome = service.predict(params.days).await?;
    Ok(Json(outcome))
}

/// All stored predictions, most recent first
pub async fn history(
    State(service): State<PredictionService>,
) -> Result<Json<Vec<PredictionRecord>>, ApiError> {
    let records = service
        .history()
        .await
        .map_err(|_| ApiError::InternalServerError("History unavailable".to_string()))?;
    Ok(Json(records))
}
