//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Prediction record in database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PredictionRecord {
    pub id: i64,
    pub days_ahead: i64,
    pub predicted_price: f64, // raw model output, not rounded
    pub created_at: DateTime<Utc>,
}

/// Create prediction input
#[derive(Debug, Clone)]
pub struct CreatePrediction {
    pub days_ahead: i64,
    pub predicted_price: f64,
}
