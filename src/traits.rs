//! Core traits for estimators and transformers.
//!
//! These traits define the API contracts shared by the pipeline stages.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised learning estimators.
///
/// Estimators implement fit/predict following sklearn conventions. `predict`
/// is fallible: calling it before `fit`, or with a feature count different
/// from the one seen at fit time, is an error rather than a panic.
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty data, dimension mismatch).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or the feature count
    /// differs from the training data.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>>;
}

/// Trait for data transformers (scalers, encoders, etc.).
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}
