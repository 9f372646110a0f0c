//! Single-feature regression models
//!
//! - [`LinearRegression`]: ordinary least squares line
//! - [`RandomForest`]: bootstrap-aggregated regression trees grown to purity
//!
//! Both map a day offset to a price. [`PriceModel`] wraps them in one
//! serializable type so the training job can persist whichever wins and the
//! server can load it without knowing which kind it is.

mod forest;
mod linear;

pub use forest::{RandomForest, RegressionTree, TreeNode, DEFAULT_SEED, DEFAULT_TREE_COUNT};
pub use linear::LinearRegression;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ModelError;

pub trait Regressor {
    fn name(&self) -> &'static str;

    fn fit(&mut self, features: &[f64], targets: &[f64]) -> Result<(), ModelError>;

    fn predict_one(&self, feature: f64) -> f64;

    fn predict(&self, features: &[f64]) -> Vec<f64> {
        features.iter().map(|&x| self.predict_one(x)).collect()
    }
}

pub(crate) fn validate_training_data(features: &[f64], targets: &[f64]) -> Result<(), ModelError> {
    if features.len() != targets.len() {
        return Err(ModelError::MismatchedLengths {
            features: features.len(),
            targets: targets.len(),
        });
    }
    if features.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if let Some(&bad) = features.iter().chain(targets).find(|v| !v.is_finite()) {
        return Err(ModelError::NonFiniteInput(bad));
    }
    Ok(())
}

/// Mean absolute error. NaN when the inputs are empty or contain NaN.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    total / actual.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceModel {
    Linear(LinearRegression),
    RandomForest(RandomForest),
}

impl PriceModel {
    fn regressor(&self) -> &dyn Regressor {
        match self {
            PriceModel::Linear(m) => m as &dyn Regressor,
            PriceModel::RandomForest(m) => m as &dyn Regressor,
        }
    }

    fn regressor_mut(&mut self) -> &mut dyn Regressor {
        match self {
            PriceModel::Linear(m) => m as &mut dyn Regressor,
            PriceModel::RandomForest(m) => m as &mut dyn Regressor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.regressor().name()
    }

    pub fn fit(&mut self, features: &[f64], targets: &[f64]) -> Result<(), ModelError> {
        self.regressor_mut().fit(features, targets)
    }

    /// Predict the price `days` ahead
    pub fn predict(&self, days: f64) -> Result<f64, ModelError> {
        if !days.is_finite() {
            return Err(ModelError::NonFiniteInput(days));
        }
        let value = self.regressor().predict_one(days);
        if !value.is_finite() {
            return Err(ModelError::NonFinitePrediction(days));
        }
        Ok(value)
    }

    pub fn predict_many(&self, features: &[f64]) -> Vec<f64> {
        self.regressor().predict(features)
    }
}
