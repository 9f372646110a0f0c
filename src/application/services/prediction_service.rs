//! Prediction Service
//!
//! Turns a horizon into a model inference plus one persisted record, and
//! replays stored predictions. The model is shared read-only; every call opens
//! its own session from the injected provider.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::errors::PredictionError;
use crate::domain::repositories::prediction_repository::SessionProvider;
use crate::domain::services::artifact::ModelArtifact;
use crate::persistence::models::{CreatePrediction, PredictionRecord};

/// Response body of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub days_ahead: i64,
    /// Rounded to 2 decimals; the stored value is the raw output
    pub predicted_price: f64,
    pub saved: bool,
}

/// Round to 2 decimal places from the exact stored value.
///
/// Scaling by 100 first can land a value like 763.77499.. on the 763.775 tie;
/// formatting rounds the exact binary value instead.
pub fn round_price(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[derive(Clone)]
pub struct PredictionService {
    model: Arc<ModelArtifact>,
    sessions: Arc<dyn SessionProvider>,
}

impl PredictionService {
    pub fn new(model: Arc<ModelArtifact>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { model, sessions }
    }

    pub async fn predict(&self, days: i64) -> Result<PredictionOutcome, PredictionError> {
        if days <= 0 {
            return Err(PredictionError::InvalidHorizon(days));
        }

        self.predict_and_store(days).await.map_err(|e| {
            error!("Prediction for {} days failed: {}", days, e);
            e
        })
    }

    async fn predict_and_store(&self, days: i64) -> Result<PredictionOutcome, PredictionError> {
        let raw = self.model.predict(days as f64)?;

        let mut session = self.sessions.session().await?;
        let record = session
            .save(CreatePrediction {
                days_ahead: days,
                predicted_price: raw,
            })
            .await?;

        info!(
            "Prediction #{}: {} days ahead -> {:.4}",
            record.id, record.days_ahead, record.predicted_price
        );

        Ok(PredictionOutcome {
            days_ahead: days,
            predicted_price: round_price(raw),
            saved: true,
        })
    }

    pub async fn history(&self) -> Result<Vec<PredictionRecord>, PredictionError> {
        let mut session = self.sessions.session().await?;
        let records = session.history().await.map_err(|e| {
            error!("Failed to load prediction history: {}", e);
            PredictionError::from(e)
        })?;
        Ok(records)
    }
}
