use std::path::PathBuf;

use thiserror::Error;

use crate::persistence::DatabaseError;

/// Problems reading the training CSV
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset has no header row")]
    MissingHeader,

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: invalid {column} value '{value}'")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Dataset contains no samples")]
    Empty,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Cannot fit a model on an empty dataset")]
    EmptyTrainingSet,

    #[error("Feature and target lengths differ: {features} vs {targets}")]
    MismatchedLengths { features: usize, targets: usize },

    #[error("Input must be finite, got {0}")]
    NonFiniteInput(f64),

    #[error("Model produced a non-finite prediction for input {0}")]
    NonFinitePrediction(f64),

    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model artifact not found at {0}. Train it first.")]
    Missing(PathBuf),

    #[error("Artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact format error: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Model fitting failed: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("No candidate model produced a finite error")]
    NoCandidateSelected,
}

/// Outcome categories of a predict or history request
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Days must be > 0")]
    InvalidHorizon(i64),

    /// Cause is kept for server-side logging only
    #[error("Prediction failed: {0}")]
    Internal(String),
}

impl PredictionError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictionError::InvalidHorizon(_))
    }
}

impl From<ModelError> for PredictionError {
    fn from(e: ModelError) -> Self {
        PredictionError::Internal(e.to_string())
    }
}

impl From<DatabaseError> for PredictionError {
    fn from(e: DatabaseError) -> Self {
        PredictionError::Internal(e.to_string())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}
