//! Model Artifact
//!
//! The trained model plus the metadata of the run that produced it, stored as
//! JSON. Training writes it; the server reads it once at startup.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::errors::{ArtifactError, ModelError};
use crate::domain::services::regression::PriceModel;

pub const DEFAULT_ARTIFACT_PATH: &str = "model/price_model.json";

/// Error of one evaluated candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub name: String,
    pub mae: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub model_name: String,
    pub training_mae: f64,
    pub samples: usize,
    pub trained_at: DateTime<Utc>,
    /// In evaluation order
    pub candidates: Vec<CandidateScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: PriceModel,
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    pub fn predict(&self, days: f64) -> Result<f64, ModelError> {
        self.model.predict(days)
    }

    /// Write the artifact, creating the parent directory and replacing any
    /// existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)?;

        info!(
            "Saved {} artifact to {}",
            self.metadata.model_name,
            path.display()
        );
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArtifactError::Missing(path.to_path_buf()));
        }

        let bytes = fs::read(path)?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;

        info!(
            "Loaded {} artifact from {} (training MAE {:.2}, {} samples)",
            artifact.metadata.model_name,
            path.display(),
            artifact.metadata.training_mae,
            artifact.metadata.samples
        );
        Ok(artifact)
    }
}
