//! Random Forest Regression
//!
//! Bootstrap-aggregated CART regression trees. Every tree sees all features
//! at every split and splits on the MSE criterion; the forest predicts the
//! mean of its trees.

use crate::InferenceError;
use ndarray::{Array1, Array2, ArrayView1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Seed for bootstrap sampling. Same data + same seed = same forest.
    pub random_state: u64,
    /// Maximum tree depth (None = grow until pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in each leaf
    pub min_samples_leaf: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            random_state: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone)]
struct RegressionLeaf {
    value: f64,
}

#[derive(Debug, Clone)]
struct RegressionNode {
    feature_idx: usize,
    threshold: f64,
    /// Samples where feature <= threshold
    left: Box<RegressionTreeNode>,
    right: Box<RegressionTreeNode>,
}

#[derive(Debug, Clone)]
enum RegressionTreeNode {
    Node(RegressionNode),
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }
}

/// Candidate split found while scanning one feature
struct Split {
    feature_idx: usize,
    threshold: f64,
    /// Weighted sum of squared errors of both children
    sse: f64,
}

/// A single fitted CART regression tree
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    root: RegressionTreeNode,
}

impl DecisionTreeRegressor {
    /// Fit a tree on the rows named by `indices` (duplicates allowed)
    fn fit(x: &Array2<f64>, y: &Array1<f64>, indices: Vec<usize>, config: &ForestConfig) -> Self {
        let builder = TreeBuilder { x, y, config };
        Self {
            root: builder.build(indices, 0),
        }
    }

    /// Predict a single sample
    pub fn predict_one(&self, sample: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(internal) => {
                    node = if sample[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }

    /// Depth of the tree (a single leaf has depth 0)
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    config: &'a ForestConfig,
}

impl TreeBuilder<'_> {
    fn build(&self, indices: Vec<usize>, depth: usize) -> RegressionTreeNode {
        let n = indices.len();
        let mean = indices.iter().map(|&i| self.y[i]).sum::<f64>() / n as f64;
        let sse: f64 = indices.iter().map(|&i| (self.y[i] - mean).powi(2)).sum();

        let at_max_depth = self.config.max_depth.is_some_and(|max| depth >= max);
        if n < self.config.min_samples_split || at_max_depth || sse <= 1e-12 {
            return RegressionTreeNode::Leaf(RegressionLeaf { value: mean });
        }

        let Some(split) = self.best_split(&indices, mean, sse) else {
            return RegressionTreeNode::Leaf(RegressionLeaf { value: mean });
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.x[[i, split.feature_idx]] <= split.threshold);

        RegressionTreeNode::Node(RegressionNode {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left: Box::new(self.build(left, depth + 1)),
            right: Box::new(self.build(right, depth + 1)),
        })
    }

    /// Best split over all features, if any reduces the parent's SSE
    fn best_split(&self, indices: &[usize], mean: f64, parent_sse: f64) -> Option<Split> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let mut best: Option<Split> = None;
        let mut sorted = indices.to_vec();

        for feature_idx in 0..self.x.ncols() {
            let value = |i: usize| self.x[[i, feature_idx]];
            sorted.copy_from_slice(indices);
            sorted.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

            // Centered targets keep the running sums well conditioned
            let total_sum: f64 = sorted.iter().map(|&i| self.y[i] - mean).sum();
            let total_sq: f64 = sorted.iter().map(|&i| (self.y[i] - mean).powi(2)).sum();
            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for pos in 1..n {
                let prev = sorted[pos - 1];
                let centered = self.y[prev] - mean;
                left_sum += centered;
                left_sq += centered * centered;

                let (lo, hi) = (value(prev), value(sorted[pos]));
                if lo >= hi || pos < min_leaf || n - pos < min_leaf {
                    continue;
                }

                let n_left = pos as f64;
                let n_right = (n - pos) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left)
                    + (right_sq - right_sum * right_sum / n_right);

                if best.as_ref().map_or(true, |b| sse < b.sse) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(Split {
                        feature_idx,
                        threshold,
                        sse,
                    });
                }
            }
        }

        best.filter(|split| split.sse < parent_sse)
    }
}

/// Random forest regressor.
///
/// Tree `i` draws its bootstrap sample from a ChaCha8 stream seeded with
/// `random_state + i`, so training is reproducible across runs and
/// platforms.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fit a forest on a training matrix and target vector
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        config: &ForestConfig,
    ) -> Result<Self, InferenceError> {
        let (n_samples, n_features) = x.dim();
        if n_samples != y.len() {
            return Err(InferenceError::Training(format!(
                "{} feature rows but {} targets",
                n_samples,
                y.len()
            )));
        }
        if n_samples == 0 {
            return Err(InferenceError::Training(
                "cannot fit with zero samples".to_string(),
            ));
        }
        if config.n_estimators == 0 {
            return Err(InferenceError::Training(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        let trees: Vec<DecisionTreeRegressor> = (0..config.n_estimators)
            .map(|i| {
                let seed = config.random_state.wrapping_add(i as u64);
                let indices = bootstrap_sample(n_samples, seed);
                DecisionTreeRegressor::fit(x, y, indices, config)
            })
            .collect();

        debug!(
            "Fitted {} trees on {}x{} (max depth {})",
            trees.len(),
            n_samples,
            n_features,
            trees.iter().map(DecisionTreeRegressor::depth).max().unwrap_or(0)
        );

        Ok(Self { trees, n_features })
    }

    /// Predict one sample as the mean over all trees
    pub fn predict_one(&self, sample: ArrayView1<'_, f64>) -> f64 {
        debug_assert_eq!(sample.len(), self.n_features);
        let total: f64 = self.trees.iter().map(|t| t.predict_one(sample)).sum();
        total / self.trees.len() as f64
    }

    /// Predict every row of a matrix
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        x.rows().into_iter().map(|row| self.predict_one(row)).collect()
    }

    /// R² of the forest's predictions on `(x, y)`
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> f64 {
        r_squared(y, &self.predict(x))
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Draw `n_samples` row indices with replacement
fn bootstrap_sample(n_samples: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n_samples)
        .map(|_| rng.random_range(0..n_samples))
        .collect()
}

/// Coefficient of determination
pub fn r_squared(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let mean = y_true.mean().unwrap_or(0.0);
    let ss_tot: f64 = y_true.iter().map(|&y| (y - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&y, &p)| (y - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn regression_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [1.0, 0.0],
            [2.0, 0.0],
            [3.0, 1.0],
            [4.0, 1.0],
            [5.0, 0.0],
            [6.0, 1.0],
            [7.0, 0.0],
            [8.0, 1.0],
        ];
        let y = array![10.0, 20.0, 35.0, 45.0, 50.0, 65.0, 70.0, 85.0];
        (x, y)
    }

    #[test]
    fn test_single_tree_fits_training_data() {
        let (x, y) = regression_data();
        let config = ForestConfig::default();
        let tree = DecisionTreeRegressor::fit(&x, &y, (0..x.nrows()).collect(), &config);
        for (row, &target) in x.rows().into_iter().zip(y.iter()) {
            assert!((tree.predict_one(row) - target).abs() < 1e-9);
        }
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let (x, y) = regression_data();
        let config = ForestConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let tree = DecisionTreeRegressor::fit(&x, &y, (0..x.nrows()).collect(), &config);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let (x, _) = regression_data();
        let y = Array1::from_elem(x.nrows(), 7.0);
        let tree = DecisionTreeRegressor::fit(&x, &y, (0..x.nrows()).collect(), &ForestConfig::default());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict_one(x.row(0)), 7.0);
    }

    #[test]
    fn test_forest_reasonable_fit() {
        let (x, y) = regression_data();
        let config = ForestConfig {
            n_estimators: 25,
            ..Default::default()
        };
        let forest = RandomForestRegressor::fit(&x, &y, &config).unwrap();
        assert_eq!(forest.n_trees(), 25);
        assert!(forest.score(&x, &y) > 0.7);
    }

    #[test]
    fn test_reproducible_with_same_seed() {
        let (x, y) = regression_data();
        let config = ForestConfig {
            n_estimators: 10,
            random_state: 7,
            ..Default::default()
        };
        let a = RandomForestRegressor::fit(&x, &y, &config).unwrap();
        let b = RandomForestRegressor::fit(&x, &y, &config).unwrap();
        let query = array![4.5, 1.0];
        assert!((a.predict_one(query.view()) - b.predict_one(query.view())).abs() < 1e-6);
        assert_eq!(a.predict(&x), b.predict(&x));
    }

    #[test]
    fn test_bootstrap_sample_deterministic() {
        assert_eq!(bootstrap_sample(50, 42), bootstrap_sample(50, 42));
        assert!(bootstrap_sample(50, 42).iter().all(|&i| i < 50));
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let (x, _) = regression_data();
        let y = array![1.0, 2.0];
        assert!(RandomForestRegressor::fit(&x, &y, &ForestConfig::default()).is_err());

        let empty_x = Array2::<f64>::zeros((0, 2));
        let empty_y = Array1::<f64>::zeros(0);
        assert!(RandomForestRegressor::fit(&empty_x, &empty_y, &ForestConfig::default()).is_err());

        let (x, y) = regression_data();
        let config = ForestConfig {
            n_estimators: 0,
            ..Default::default()
        };
        assert!(RandomForestRegressor::fit(&x, &y, &config).is_err());
    }

    #[test]
    fn test_r_squared() {
        let y = array![1.0, 2.0, 3.0];
        assert_eq!(r_squared(&y, &y), 1.0);
        let mean_pred = array![2.0, 2.0, 2.0];
        assert_eq!(r_squared(&y, &mean_pred), 0.0);
    }
}
