//! Prediction Repository Traits
//!
//! `SessionProvider` hands out one `PredictionRepository` session per request.
//! The session owns its database connection and gives it back when dropped, so
//! a request that fails halfway never leaks a connection.

use crate::persistence::models::{CreatePrediction, PredictionRecord};
use crate::persistence::DatabaseError;
use async_trait::async_trait;

/// A unit of work bound to a single request
#[async_trait]
pub trait PredictionRepository: Send {
    /// Insert a record, commit it and reload it with its assigned id and timestamp
    async fn save(&mut self, input: CreatePrediction) -> Result<PredictionRecord, DatabaseError>;

    /// All records, most recent first
    async fn history(&mut self) -> Result<Vec<PredictionRecord>, DatabaseError>;
}

/// Source of request-scoped sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session(&self) -> Result<Box<dyn PredictionRepository>, DatabaseError>;
}
