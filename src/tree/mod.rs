//! Decision tree and random forest regressors.
//!
//! The forest is the pipeline's regression model: an ensemble of CART trees
//! trained on bootstrap samples, with predictions averaged across trees.
//! Training is deterministic under a fixed `random_state`; each tree seeds
//! its bootstrap draw from `random_state + tree_index`.

use crate::error::{RendimientoError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Leaf node in a regression tree.
///
/// Contains the predicted value (mean of training samples) and the number
/// of training samples that reached this leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionLeaf {
    /// Predicted value for this leaf (mean of y values)
    pub value: f32,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<RegressionTreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegressionTreeNode {
    /// Internal decision node with split condition
    Node(RegressionNode),
    /// Leaf node with value prediction
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }
}

/// Decision tree regressor using the CART algorithm.
///
/// Uses Mean Squared Error for the splitting criterion and builds trees
/// recursively. Leaf nodes predict the mean of target values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    tree: Option<RegressionTreeNode>,
    n_features: Option<usize>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
}

impl DecisionTreeRegressor {
    /// Creates a new decision tree regressor with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            n_features: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    /// Sets the maximum depth of the tree.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum number of samples required to split an internal node.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Sets the minimum number of samples required to be at a leaf node.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Returns true if the tree has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Predicts the value for a single sample.
    fn predict_one(&self, tree: &RegressionTreeNode, x: &[f32]) -> f32 {
        let mut node = tree;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(internal) => {
                    if x[internal.feature_idx] <= internal.threshold {
                        node = &internal.left;
                    } else {
                        node = &internal.right;
                    }
                }
            }
        }
    }
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for DecisionTreeRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_rows, n_cols) = x.shape();
        if n_rows != y.len() {
            return Err(RendimientoError::dimension_mismatch(
                "samples",
                n_rows,
                y.len(),
            ));
        }
        if n_rows == 0 {
            return Err(RendimientoError::config("cannot fit with zero samples"));
        }

        self.tree = Some(build_regression_tree(
            x,
            y,
            0,
            self.max_depth,
            self.min_samples_split,
            self.min_samples_leaf,
        ));
        self.n_features = Some(n_cols);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| RendimientoError::config("tree not fitted"))?;

        let (n_samples, n_features) = x.shape();
        if let Some(expected) = self.n_features {
            if n_features != expected {
                return Err(RendimientoError::dimension_mismatch(
                    "features",
                    expected,
                    n_features,
                ));
            }
        }

        let mut predictions = Vec::with_capacity(n_samples);
        let mut sample = Vec::with_capacity(n_features);
        for row in 0..n_samples {
            sample.clear();
            for col in 0..n_features {
                sample.push(x.get(row, col));
            }
            predictions.push(self.predict_one(tree, &sample));
        }

        Ok(Vector::from_vec(predictions))
    }
}

/// Random forest regressor.
///
/// Ensemble of decision tree regressors trained on bootstrap samples.
/// Predictions are averaged across all trees to reduce variance.
///
/// # Examples
///
/// ```
/// use rendimiento::primitives::{Matrix, Vector};
/// use rendimiento::traits::Estimator;
/// use rendimiento::tree::RandomForestRegressor;
///
/// let x = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]).expect("valid dimensions");
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);
///
/// let mut rf = RandomForestRegressor::new(10)
///     .with_max_depth(5)
///     .with_random_state(42);
/// rf.fit(&x, &y).expect("fit should succeed");
/// let predictions = rf.predict(&x).expect("predict should succeed");
/// assert_eq!(predictions.len(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_estimators: usize,
    n_features: Option<usize>,
    max_depth: Option<usize>,
    random_state: Option<u64>,
}

impl RandomForestRegressor {
    /// Creates a new random forest regressor.
    ///
    /// # Arguments
    ///
    /// * `n_estimators` - Number of trees in the forest
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            n_features: None,
            max_depth: None,
            random_state: None,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Returns true if the forest has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Number of trees configured for the forest.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Saves the fitted forest to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is unfitted, or if serialization or
    /// file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if !self.is_fitted() {
            return Err(RendimientoError::config("cannot save an unfitted forest"));
        }
        let bytes = bincode::serialize(self)
            .map_err(|e| RendimientoError::Serialization(format!("model encode: {e}")))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a fitted forest from a binary file.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails, or if the
    /// stored forest is unfitted.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        let forest: Self = bincode::deserialize(&bytes)
            .map_err(|e| RendimientoError::Serialization(format!("model decode: {e}")))?;
        if !forest.is_fitted() {
            return Err(RendimientoError::config("loaded forest is not fitted"));
        }
        Ok(forest)
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Estimator for RandomForestRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err(RendimientoError::dimension_mismatch(
                "samples",
                n_samples,
                y.len(),
            ));
        }
        if n_samples == 0 {
            return Err(RendimientoError::config("cannot fit with zero samples"));
        }
        if self.n_estimators == 0 {
            return Err(RendimientoError::config(
                "forest needs at least one estimator",
            ));
        }

        self.trees = Vec::with_capacity(self.n_estimators);
        self.n_features = Some(n_features);

        for i in 0..self.n_estimators {
            let seed = self.random_state.map(|s| s + i as u64);
            let bootstrap_indices = bootstrap_sample(n_samples, seed);

            let mut bootstrap_x_data = Vec::with_capacity(n_samples * n_features);
            let mut bootstrap_y_data = Vec::with_capacity(n_samples);
            for &idx in &bootstrap_indices {
                for j in 0..n_features {
                    bootstrap_x_data.push(x.get(idx, j));
                }
                bootstrap_y_data.push(y[idx]);
            }

            let bootstrap_x = Matrix::from_vec(n_samples, n_features, bootstrap_x_data)?;
            let bootstrap_y = Vector::from_vec(bootstrap_y_data);

            let mut tree = if let Some(max_depth) = self.max_depth {
                DecisionTreeRegressor::new().with_max_depth(max_depth)
            } else {
                DecisionTreeRegressor::new()
            };

            tree.fit(&bootstrap_x, &bootstrap_y)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    /// Predicts by averaging the predictions of all trees.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        if self.trees.is_empty() {
            return Err(RendimientoError::config("forest not fitted"));
        }

        let (n_samples, n_features) = x.shape();
        if let Some(expected) = self.n_features {
            if n_features != expected {
                return Err(RendimientoError::dimension_mismatch(
                    "features",
                    expected,
                    n_features,
                ));
            }
        }

        let mut predictions = vec![0.0; n_samples];
        for tree in &self.trees {
            let tree_preds = tree.predict(x)?;
            for (pred, &tree_pred) in predictions.iter_mut().zip(tree_preds.as_slice().iter()) {
                *pred += tree_pred;
            }
        }

        let n_trees = self.trees.len() as f32;
        for pred in &mut predictions {
            *pred /= n_trees;
        }

        Ok(Vector::from_vec(predictions))
    }
}

// ========================================================================
// Tree building
// ========================================================================

/// Compute the mean of a slice.
fn mean_f32(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

/// Compute the variance of target values.
fn variance_f32(y: &[f32]) -> f32 {
    if y.len() <= 1 {
        return 0.0;
    }

    let mean = mean_f32(y);
    let sum_squared_diff: f32 = y.iter().map(|&val| (val - mean).powi(2)).sum();
    sum_squared_diff / y.len() as f32
}

/// Weighted child variance for a candidate split.
fn weighted_split_variance(y_left: &[f32], y_right: &[f32]) -> f32 {
    let n_left = y_left.len() as f32;
    let n_right = y_right.len() as f32;
    let n_total = n_left + n_right;

    if n_total == 0.0 {
        return 0.0;
    }

    (n_left / n_total) * variance_f32(y_left) + (n_right / n_total) * variance_f32(y_right)
}

/// Get unique sorted feature values for splitting.
fn unique_feature_values(x: &Matrix<f32>, feature_idx: usize, n_samples: usize) -> Vec<f32> {
    let mut values: Vec<f32> = (0..n_samples).map(|i| x.get(i, feature_idx)).collect();
    values.sort_by(|a, b| a.partial_cmp(b).expect("feature values are finite"));
    values.dedup();
    values
}

/// Split y values by a threshold on a feature.
fn split_by_threshold(
    x: &Matrix<f32>,
    y: &[f32],
    feature_idx: usize,
    threshold: f32,
) -> (Vec<f32>, Vec<f32>) {
    let mut y_left = Vec::new();
    let mut y_right = Vec::new();

    for (row, &y_val) in y.iter().enumerate() {
        if x.get(row, feature_idx) <= threshold {
            y_left.push(y_val);
        } else {
            y_right.push(y_val);
        }
    }
    (y_left, y_right)
}

/// Find the best split for a single feature.
fn best_split_for_feature(
    x: &Matrix<f32>,
    y: &[f32],
    feature_idx: usize,
    n_samples: usize,
    current_variance: f32,
) -> Option<(f32, f32)> {
    let feature_values = unique_feature_values(x, feature_idx, n_samples);
    let mut best_threshold = 0.0;
    let mut best_gain = 0.0;

    for i in 0..feature_values.len().saturating_sub(1) {
        let threshold = (feature_values[i] + feature_values[i + 1]) / 2.0;
        let (y_left, y_right) = split_by_threshold(x, y, feature_idx, threshold);

        if y_left.is_empty() || y_right.is_empty() {
            continue;
        }
        let gain = current_variance - weighted_split_variance(&y_left, &y_right);
        if gain > best_gain {
            best_gain = gain;
            best_threshold = threshold;
        }
    }

    (best_gain > 0.0).then_some((best_threshold, best_gain))
}

/// Find the best split across all features using the MSE criterion.
///
/// Returns (feature_idx, threshold, mse_reduction) if a valid split exists.
fn find_best_split(x: &Matrix<f32>, y: &[f32]) -> Option<(usize, f32, f32)> {
    let (n_samples, n_features) = x.shape();

    if n_samples < 2 {
        return None;
    }

    let current_variance = variance_f32(y);
    let mut best_gain = 0.0;
    let mut best_feature = 0;
    let mut best_threshold = 0.0;

    for feature_idx in 0..n_features {
        if let Some((threshold, gain)) =
            best_split_for_feature(x, y, feature_idx, n_samples, current_variance)
        {
            if gain > best_gain {
                best_gain = gain;
                best_feature = feature_idx;
                best_threshold = threshold;
            }
        }
    }

    (best_gain > 0.0).then_some((best_feature, best_threshold, best_gain))
}

/// Partition sample indices based on a feature threshold.
fn partition_by_threshold(
    x: &Matrix<f32>,
    n_samples: usize,
    feature_idx: usize,
    threshold: f32,
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for row in 0..n_samples {
        if x.get(row, feature_idx) <= threshold {
            left.push(row);
        } else {
            right.push(row);
        }
    }
    (left, right)
}

/// Extract the subset of rows and labels selected by `indices`.
fn subset_by_indices(x: &Matrix<f32>, y: &[f32], indices: &[usize]) -> (Matrix<f32>, Vec<f32>) {
    let n_features = x.shape().1;
    let mut subset_data = Vec::with_capacity(indices.len() * n_features);
    let mut subset_labels = Vec::with_capacity(indices.len());

    for &idx in indices {
        for col in 0..n_features {
            subset_data.push(x.get(idx, col));
        }
        subset_labels.push(y[idx]);
    }

    let subset_matrix = Matrix::from_vec(indices.len(), n_features, subset_data)
        .expect("subset dimensions are consistent");
    (subset_matrix, subset_labels)
}

/// Create a regression leaf node from y values.
fn make_leaf(y_slice: &[f32], n_samples: usize) -> RegressionTreeNode {
    RegressionTreeNode::Leaf(RegressionLeaf {
        value: mean_f32(y_slice),
        n_samples,
    })
}

/// Check if we've reached max depth.
fn at_max_depth(depth: usize, max_depth: Option<usize>) -> bool {
    max_depth.is_some_and(|max_d| depth >= max_d)
}

/// Build a regression decision tree recursively.
fn build_regression_tree(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    depth: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
) -> RegressionTreeNode {
    let n_samples = y.len();
    let y_slice = y.as_slice();

    // Early stopping checks
    if n_samples < min_samples_split
        || at_max_depth(depth, max_depth)
        || variance_f32(y_slice) < 1e-10
    {
        return make_leaf(y_slice, n_samples);
    }

    let Some((feature_idx, threshold, _gain)) = find_best_split(x, y_slice) else {
        return make_leaf(y_slice, n_samples);
    };

    let (left_indices, right_indices) = partition_by_threshold(x, n_samples, feature_idx, threshold);

    if left_indices.len() < min_samples_leaf || right_indices.len() < min_samples_leaf {
        return make_leaf(y_slice, n_samples);
    }

    let (left_matrix, left_labels) = subset_by_indices(x, y_slice, &left_indices);
    let (right_matrix, right_labels) = subset_by_indices(x, y_slice, &right_indices);

    let left_child = build_regression_tree(
        &left_matrix,
        &Vector::from_vec(left_labels),
        depth + 1,
        max_depth,
        min_samples_split,
        min_samples_leaf,
    );
    let right_child = build_regression_tree(
        &right_matrix,
        &Vector::from_vec(right_labels),
        depth + 1,
        max_depth,
        min_samples_split,
        min_samples_leaf,
    );

    RegressionTreeNode::Node(RegressionNode {
        feature_idx,
        threshold,
        left: Box::new(left_child),
        right: Box::new(right_child),
    })
}

/// Creates a bootstrap sample (random sample with replacement).
///
/// Returns indices of samples to include in the bootstrap sample.
fn bootstrap_sample(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    use rand::distributions::{Distribution, Uniform};
    use rand::SeedableRng;

    let dist = Uniform::from(0..n_samples);

    let mut indices = Vec::with_capacity(n_samples);

    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        for _ in 0..n_samples {
            indices.push(dist.sample(&mut rng));
        }
    } else {
        let mut rng = rand::thread_rng();
        for _ in 0..n_samples {
            indices.push(dist.sample(&mut rng));
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regression_data() -> (Matrix<f32>, Vector<f32>) {
        // y = 2x, eight points
        let x = Matrix::from_vec(8, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])
            .expect("valid dimensions");
        let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0]);
        (x, y)
    }

    #[test]
    fn test_tree_fits_and_predicts() {
        let (x, y) = regression_data();
        let mut tree = DecisionTreeRegressor::new().with_max_depth(4);
        tree.fit(&x, &y).expect("fit should succeed");
        assert!(tree.is_fitted());

        let preds = tree.predict(&x).expect("predict should succeed");
        assert_eq!(preds.len(), 8);
        // Deep enough tree memorizes a noiseless monotone target
        for (i, &pred) in preds.as_slice().iter().enumerate() {
            assert!((pred - y[i]).abs() < 1.0, "prediction {i} too far off");
        }
    }

    #[test]
    fn test_tree_unfitted_predict_fails() {
        let tree = DecisionTreeRegressor::new();
        let x = Matrix::zeros(1, 1);
        assert!(matches!(
            tree.predict(&x),
            Err(RendimientoError::Config { .. })
        ));
    }

    #[test]
    fn test_tree_feature_mismatch_fails() {
        let (x, y) = regression_data();
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).expect("fit should succeed");
        let wrong = Matrix::zeros(1, 3);
        assert!(matches!(
            tree.predict(&wrong),
            Err(RendimientoError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_tree_constant_target_is_single_leaf() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("valid dimensions");
        let y = Vector::from_slice(&[5.0, 5.0, 5.0, 5.0]);
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).expect("fit should succeed");
        let preds = tree.predict(&x).expect("predict should succeed");
        for &pred in preds.as_slice() {
            assert_eq!(pred, 5.0);
        }
    }

    #[test]
    fn test_tree_max_depth_respected() {
        let (x, y) = regression_data();
        let mut tree = DecisionTreeRegressor::new().with_max_depth(1);
        tree.fit(&x, &y).expect("fit should succeed");
        let depth = tree.tree.as_ref().expect("fitted").depth();
        assert!(depth <= 1, "depth {depth} exceeds max_depth");
    }

    #[test]
    fn test_tree_sample_count_mismatch() {
        let x = Matrix::zeros(3, 1);
        let y = Vector::from_slice(&[1.0, 2.0]);
        let mut tree = DecisionTreeRegressor::new();
        assert!(matches!(
            tree.fit(&x, &y),
            Err(RendimientoError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_forest_fit_creates_trees() {
        let (x, y) = regression_data();
        let mut rf = RandomForestRegressor::new(5)
            .with_max_depth(4)
            .with_random_state(42);
        rf.fit(&x, &y).expect("fit should succeed");
        assert_eq!(rf.trees.len(), 5);
        assert!(rf.is_fitted());
    }

    #[test]
    fn test_forest_predict_length() {
        let (x, y) = regression_data();
        let mut rf = RandomForestRegressor::new(3)
            .with_max_depth(4)
            .with_random_state(42);
        rf.fit(&x, &y).expect("fit should succeed");
        let preds = rf.predict(&x).expect("predict should succeed");
        assert_eq!(preds.len(), 8);
    }

    #[test]
    fn test_forest_deterministic_with_seed() {
        let (x, y) = regression_data();
        let mut rf1 = RandomForestRegressor::new(5)
            .with_max_depth(4)
            .with_random_state(42);
        rf1.fit(&x, &y).expect("fit should succeed");
        let mut rf2 = RandomForestRegressor::new(5)
            .with_max_depth(4)
            .with_random_state(42);
        rf2.fit(&x, &y).expect("fit should succeed");

        let p1 = rf1.predict(&x).expect("predict should succeed");
        let p2 = rf2.predict(&x).expect("predict should succeed");
        assert_eq!(p1.as_slice(), p2.as_slice());

        let b1 = bincode::serialize(&rf1).expect("serialize should succeed");
        let b2 = bincode::serialize(&rf2).expect("serialize should succeed");
        assert_eq!(b1, b2, "identical seeds should yield identical models");
    }

    #[test]
    fn test_forest_different_seeds_differ() {
        let (x, y) = regression_data();
        let mut rf1 = RandomForestRegressor::new(5).with_random_state(42);
        rf1.fit(&x, &y).expect("fit should succeed");
        let mut rf2 = RandomForestRegressor::new(5).with_random_state(7);
        rf2.fit(&x, &y).expect("fit should succeed");

        let b1 = bincode::serialize(&rf1).expect("serialize should succeed");
        let b2 = bincode::serialize(&rf2).expect("serialize should succeed");
        assert_ne!(b1, b2);
    }

    #[test]
    fn test_forest_zero_estimators_is_config_error() {
        let (x, y) = regression_data();
        let mut rf = RandomForestRegressor::new(0);
        assert!(matches!(
            rf.fit(&x, &y),
            Err(RendimientoError::Config { .. })
        ));
    }

    #[test]
    fn test_forest_unfitted_predict_fails() {
        let rf = RandomForestRegressor::new(3);
        let x = Matrix::zeros(1, 1);
        assert!(rf.predict(&x).is_err());
    }

    #[test]
    fn test_forest_feature_mismatch_fails() {
        let (x, y) = regression_data();
        let mut rf = RandomForestRegressor::new(2).with_random_state(42);
        rf.fit(&x, &y).expect("fit should succeed");
        let wrong = Matrix::zeros(1, 4);
        assert!(matches!(
            rf.predict(&wrong),
            Err(RendimientoError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_forest_save_load_round_trip() {
        let (x, y) = regression_data();
        let mut rf = RandomForestRegressor::new(3)
            .with_max_depth(4)
            .with_random_state(42);
        rf.fit(&x, &y).expect("fit should succeed");
        let expected = rf.predict(&x).expect("predict should succeed");

        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("model.bin");
        rf.save(&path).expect("save should succeed");

        let loaded = RandomForestRegressor::load(&path).expect("load should succeed");
        let actual = loaded.predict(&x).expect("predict should succeed");
        assert_eq!(expected.as_slice(), actual.as_slice());
    }

    #[test]
    fn test_forest_save_unfitted_fails() {
        let rf = RandomForestRegressor::new(3);
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        assert!(rf.save(dir.path().join("model.bin")).is_err());
    }

    #[test]
    fn test_bootstrap_sample_is_seeded() {
        let a = bootstrap_sample(20, Some(42));
        let b = bootstrap_sample(20, Some(42));
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        assert!(a.iter().all(|&i| i < 20));
    }
}
