use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{validate_training_data, Regressor};
use crate::domain::errors::ModelError;

pub const DEFAULT_TREE_COUNT: usize = 100;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    /// `feature <= threshold` goes left
    Split {
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Regression tree stored as a flat node list, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Grow a tree to purity over the given sample indices.
    ///
    /// A node is split while it holds at least two samples with differing
    /// targets and more than one distinct feature value.
    pub fn grow(features: &[f64], targets: &[f64], indices: Vec<usize>) -> Self {
        let mut nodes = vec![TreeNode::Leaf { value: 0.0 }];
        let mut pending = vec![(0usize, indices)];

        while let Some((node_id, mut idx)) = pending.pop() {
            match best_split(features, targets, &mut idx) {
                Some((threshold, split_at)) => {
                    let right_idx = idx.split_off(split_at);
                    let left = nodes.len();
                    let right = left + 1;
                    nodes.push(TreeNode::Leaf { value: 0.0 });
                    nodes.push(TreeNode::Leaf { value: 0.0 });
                    nodes[node_id] = TreeNode::Split {
                        threshold,
                        left,
                        right,
                    };
                    pending.push((right, right_idx));
                    pending.push((left, idx));
                }
                None => {
                    let value = idx.iter().map(|&i| targets[i]).sum::<f64>() / idx.len() as f64;
                    nodes[node_id] = TreeNode::Leaf { value };
                }
            }
        }

        RegressionTree { nodes }
    }

    pub fn predict_one(&self, feature: f64) -> f64 {
        let mut current = 0;
        loop {
            match self.nodes[current] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    threshold,
                    left,
                    right,
                } => {
                    current = if feature <= threshold { left } else { right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Sorts `idx` by feature and returns the threshold and the position in the
/// sorted slice where the right child starts. `None` when the node is pure or
/// cannot be split.
fn best_split(features: &[f64], targets: &[f64], idx: &mut [usize]) -> Option<(f64, usize)> {
    let n = idx.len();
    if n < 2 {
        return None;
    }

    let first = targets[idx[0]];
    if idx.iter().all(|&i| targets[i] == first) {
        return None;
    }

    idx.sort_by(|&a, &b| features[a].total_cmp(&features[b]));

    let total_sum: f64 = idx.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = idx.iter().map(|&i| targets[i] * targets[i]).sum();

    let mut left_sum = 0.0;
    let mut left_sq = 0.0;
    let mut best: Option<(f64, usize)> = None;
    let mut best_sse = f64::INFINITY;

    for pos in 1..n {
        let y = targets[idx[pos - 1]];
        left_sum += y;
        left_sq += y * y;

        let lo = features[idx[pos - 1]];
        let hi = features[idx[pos]];
        if lo == hi {
            continue;
        }

        let n_left = pos as f64;
        let n_right = (n - pos) as f64;
        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let sse = (left_sq - left_sum * left_sum / n_left)
            + (right_sq - right_sum * right_sum / n_right);

        if sse < best_sse {
            best_sse = sse;
            let mut threshold = lo + (hi - lo) / 2.0;
            if threshold >= hi {
                threshold = lo;
            }
            best = Some((threshold, pos));
        }
    }

    best
}

/// Bagged regression trees with a fixed tree count and seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_estimators: usize,
    pub seed: u64,
    trees: Vec<RegressionTree>,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(DEFAULT_TREE_COUNT, DEFAULT_SEED)
    }
}

impl RandomForest {
    pub fn new(n_estimators: usize, seed: u64) -> Self {
        RandomForest {
            n_estimators,
            seed,
            trees: Vec::new(),
        }
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

impl Regressor for RandomForest {
    fn name(&self) -> &'static str {
        "RandomForest"
    }

    fn fit(&mut self, features: &[f64], targets: &[f64]) -> Result<(), ModelError> {
        validate_training_data(features, targets)?;
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameters(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(self.seed);

        self.trees = (0..self.n_estimators)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::grow(features, targets, bootstrap)
            })
            .collect();

        Ok(())
    }

    fn predict_one(&self, feature: f64) -> f64 {
        if self.trees.is_empty() {
            return f64::NAN;
        }
        let total: f64 = self.trees.iter().map(|t| t.predict_one(feature)).sum();
        total / self.trees.len() as f64
    }
}
