use serde::{Deserialize, Serialize};

use super::{validate_training_data, Regressor};
use crate::domain::errors::ModelError;

/// `price = slope * day + intercept`, fitted by ordinary least squares
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_coefficients(slope: f64, intercept: f64) -> Self {
        LinearRegression { slope, intercept }
    }
}

impl Regressor for LinearRegression {
    fn name(&self) -> &'static str {
        "LinearRegression"
    }

    fn fit(&mut self, features: &[f64], targets: &[f64]) -> Result<(), ModelError> {
        validate_training_data(features, targets)?;

        let n = features.len() as f64;
        let mean_x = features.iter().sum::<f64>() / n;
        let mean_y = targets.iter().sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for (&x, &y) in features.iter().zip(targets) {
            covariance += (x - mean_x) * (y - mean_y);
            variance += (x - mean_x) * (x - mean_x);
        }

        // Constant feature: flat line through the mean
        self.slope = if variance > 0.0 {
            covariance / variance
        } else {
            0.0
        };
        self.intercept = mean_y - self.slope * mean_x;
        Ok(())
    }

    fn predict_one(&self, feature: f64) -> f64 {
        self.slope * feature + self.intercept
    }
}
