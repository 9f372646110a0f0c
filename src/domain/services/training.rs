//! Offline training
//!
//! Fits every candidate on the full dataset, scores each by mean absolute error
//! on that same data and keeps the one with the strictly lowest error. Scoring
//! on training data overstates the forest's accuracy; there is no held-out split.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::entities::dataset::Dataset;
use crate::domain::errors::TrainingError;
use crate::domain::services::artifact::{
    ArtifactMetadata, CandidateScore, ModelArtifact, DEFAULT_ARTIFACT_PATH,
};
use crate::domain::services::regression::{
    mean_absolute_error, LinearRegression, PriceModel, RandomForest, DEFAULT_SEED,
    DEFAULT_TREE_COUNT,
};

pub const DEFAULT_DATA_PATH: &str = "data/prices.csv";

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub data_path: PathBuf,
    pub artifact_path: PathBuf,
    pub n_estimators: usize,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            n_estimators: DEFAULT_TREE_COUNT,
            seed: DEFAULT_SEED,
        }
    }
}

/// Candidates in evaluation order. Ties go to the earlier entry.
pub fn candidates(config: &TrainingConfig) -> Vec<PriceModel> {
    vec![
        PriceModel::Linear(LinearRegression::new()),
        PriceModel::RandomForest(RandomForest::new(config.n_estimators, config.seed)),
    ]
}

/// Index of the strictly lowest error. NaN never wins.
pub fn select_best(errors: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut best_error = f64::INFINITY;
    for (i, &error) in errors.iter().enumerate() {
        if error < best_error {
            best_error = error;
            best = Some(i);
        }
    }
    best
}

pub fn train(dataset: &Dataset, config: &TrainingConfig) -> Result<ModelArtifact, TrainingError> {
    let days = dataset.days();
    let prices = dataset.prices();

    let mut fitted = Vec::new();
    let mut scores = Vec::new();
    for mut model in candidates(config) {
        model.fit(&days, &prices)?;
        let mae = mean_absolute_error(&prices, &model.predict_many(&days));
        info!("{} MAE: {:.2}", model.name(), mae);
        if mae.is_nan() {
            warn!("{} produced a NaN error and cannot be selected", model.name());
        }

        scores.push(CandidateScore {
            name: model.name().to_string(),
            mae,
        });
        fitted.push(model);
    }

    let errors: Vec<f64> = scores.iter().map(|s| s.mae).collect();
    let winner = select_best(&errors).ok_or(TrainingError::NoCandidateSelected)?;
    let training_mae = errors[winner];
    let model = fitted.swap_remove(winner);

    Ok(ModelArtifact {
        metadata: ArtifactMetadata {
            model_name: model.name().to_string(),
            training_mae,
            samples: dataset.len(),
            trained_at: Utc::now(),
            candidates: scores,
        },
        model,
    })
}

/// Load the dataset, train, and write the winning artifact
pub fn run(config: &TrainingConfig) -> Result<ModelArtifact, TrainingError> {
    info!("Loading training data from {}", config.data_path.display());
    let dataset = Dataset::from_csv_path(&config.data_path)?;
    info!("Loaded {} samples", dataset.len());

    let artifact = train(&dataset, config)?;
    artifact.save(&config.artifact_path)?;

    info!(
        "✓ Best model saved: {} (MAE {:.2})",
        artifact.metadata.model_name, artifact.metadata.training_mae
    );
    Ok(artifact)
}
