//! Preprocessing transformers for the study-habit feature table.
//!
//! The table has a fixed shape: five numeric features standardized to zero
//! mean and unit variance, followed by the one-hot block for the single
//! categorical feature. [`TablePreprocessor`] owns that column order and is
//! the unit that gets fitted at training time, serialized, and reloaded
//! read-only at inference time.
//!
//! # Example
//!
//! ```
//! use rendimiento::data::RawRecord;
//! use rendimiento::features::derive_all;
//! use rendimiento::preprocessing::TablePreprocessor;
//!
//! let records = vec![
//!     RawRecord::new(2.0, 75.0, 7.0, 10, "yes").expect("valid record"),
//!     RawRecord::new(6.0, 90.0, 5.0, 3, "no").expect("valid record"),
//! ];
//! let derived = derive_all(&records);
//!
//! let mut preprocessor = TablePreprocessor::new();
//! let encoded = preprocessor.fit_transform(&derived).expect("fit should succeed");
//! assert_eq!(encoded.shape(), (2, 7)); // 5 numeric + 2 one-hot columns
//! ```

use crate::error::{RendimientoError, Result};
use crate::features::{DerivedRecord, CATEGORICAL_FEATURE, NUMERIC_FEATURES};
use crate::primitives::{Matrix, Vector};
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Standardizes features by removing mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std
///
/// Columns whose standard deviation is (numerically) zero are centered but
/// not divided, which is equivalent to substituting std = 1 for the
/// degenerate column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f32>>,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a new unfitted `StandardScaler`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Returns the mean of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f32] {
        self.mean
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns the standard deviation of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn std(&self) -> &[f32] {
        self.std
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(RendimientoError::config("cannot fit with zero samples"));
        }

        let mut mean = vec![0.0; n_features];
        for (j, mean_j) in mean.iter_mut().enumerate() {
            let mut sum = 0.0;
            for i in 0..n_samples {
                sum += x.get(i, j);
            }
            *mean_j = sum / n_samples as f32;
        }

        // Population std (divide by n, not n-1), matching sklearn
        let mut std = vec![0.0; n_features];
        for (j, std_j) in std.iter_mut().enumerate() {
            let mut sum_sq = 0.0;
            for i in 0..n_samples {
                let diff = x.get(i, j) - mean[j];
                sum_sq += diff * diff;
            }
            *std_j = (sum_sq / n_samples as f32).sqrt();
        }

        self.mean = Some(mean);
        self.std = Some(std);

        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| RendimientoError::config("scaler not fitted"))?;
        let std = self
            .std
            .as_ref()
            .ok_or_else(|| RendimientoError::config("scaler not fitted"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(RendimientoError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = vec![0.0; n_samples * n_features];

        for i in 0..n_samples {
            for j in 0..n_features {
                let mut val = x.get(i, j) - mean[j];
                // Degenerate columns keep their centered value
                if std[j] > 1e-10 {
                    val /= std[j];
                }
                result[i * n_features + j] = val;
            }
        }

        Matrix::from_vec(n_samples, n_features, result)
    }
}

/// One-hot encoder over a learned category vocabulary.
///
/// The vocabulary is the sorted set of distinct values observed at fit time.
/// A value never seen during fit encodes to an all-zero block; this mirrors
/// `handle_unknown="ignore"` behavior and is a designed degenerate case, not
/// an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Option<Vec<String>>,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl OneHotEncoder {
    /// Creates a new unfitted `OneHotEncoder`.
    #[must_use]
    pub fn new() -> Self {
        Self { categories: None }
    }

    /// Returns true if the encoder has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.categories.is_some()
    }

    /// Learns the sorted vocabulary of distinct values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when given zero values.
    pub fn fit<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        if values.is_empty() {
            return Err(RendimientoError::config("cannot fit with zero values"));
        }

        let mut categories: Vec<String> =
            values.iter().map(|v| v.as_ref().to_string()).collect();
        categories.sort_unstable();
        categories.dedup();

        self.categories = Some(categories);
        Ok(())
    }

    /// Encodes values against the learned vocabulary, one row per value.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the encoder is not fitted.
    pub fn transform<S: AsRef<str>>(&self, values: &[S]) -> Result<Matrix<f32>> {
        let categories = self
            .categories
            .as_ref()
            .ok_or_else(|| RendimientoError::config("encoder not fitted"))?;

        let n_categories = categories.len();
        let mut result = Matrix::zeros(values.len(), n_categories);

        for (i, value) in values.iter().enumerate() {
            // Unseen values leave the row all-zero
            if let Ok(j) = categories.binary_search_by(|c| c.as_str().cmp(value.as_ref())) {
                result.set(i, j, 1.0);
            }
        }

        Ok(result)
    }

    /// Returns the learned vocabulary.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the encoder is not fitted.
    pub fn categories(&self) -> Result<&[String]> {
        self.categories
            .as_deref()
            .ok_or_else(|| RendimientoError::config("encoder not fitted"))
    }

    /// Number of learned categories.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the encoder is not fitted.
    pub fn n_categories(&self) -> Result<usize> {
        Ok(self.categories()?.len())
    }
}

/// Column transformer for derived study-habit records.
///
/// Standardizes the numeric block and one-hot-encodes the categorical
/// feature, producing encoded rows in a fixed column order: the five numeric
/// features, then one column per learned category. Immutable once fitted;
/// training serializes it and inference loads it read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePreprocessor {
    scaler: StandardScaler,
    encoder: OneHotEncoder,
}

impl Default for TablePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TablePreprocessor {
    /// Creates a new unfitted preprocessor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(),
        }
    }

    /// Returns true if both internal transformers are fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.scaler.is_fitted() && self.encoder.is_fitted()
    }

    /// Fits the scaler and encoder on derived records.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when given zero records.
    pub fn fit(&mut self, records: &[DerivedRecord]) -> Result<()> {
        if records.is_empty() {
            return Err(RendimientoError::config("cannot fit with zero records"));
        }

        self.scaler.fit(&numeric_matrix(records))?;
        let categories: Vec<&str> = records.iter().map(DerivedRecord::category).collect();
        self.encoder.fit(&categories)?;

        Ok(())
    }

    /// Encodes derived records using the fitted statistics.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the preprocessor is not fitted.
    pub fn transform(&self, records: &[DerivedRecord]) -> Result<Matrix<f32>> {
        let numeric = self.scaler.transform(&numeric_matrix(records))?;
        let categories: Vec<&str> = records.iter().map(DerivedRecord::category).collect();
        let encoded = self.encoder.transform(&categories)?;
        numeric.hstack(&encoded)
    }

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit_transform(&mut self, records: &[DerivedRecord]) -> Result<Matrix<f32>> {
        self.fit(records)?;
        self.transform(records)
    }

    /// Encodes a single record as a vector.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the preprocessor is not fitted.
    pub fn transform_one(&self, record: &DerivedRecord) -> Result<Vector<f32>> {
        let encoded = self.transform(std::slice::from_ref(record))?;
        Ok(encoded.row(0))
    }

    /// Number of numeric output columns.
    #[must_use]
    pub fn n_numeric(&self) -> usize {
        NUMERIC_FEATURES.len()
    }

    /// Number of one-hot output columns.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the preprocessor is not fitted.
    pub fn n_categories(&self) -> Result<usize> {
        self.encoder.n_categories()
    }

    /// Total number of encoded output columns.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the preprocessor is not fitted.
    pub fn n_output_features(&self) -> Result<usize> {
        Ok(self.n_numeric() + self.n_categories()?)
    }

    /// Names of the six logical input features in output order, with the
    /// one-hot block folded under the single categorical name.
    #[must_use]
    pub fn logical_feature_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = NUMERIC_FEATURES.to_vec();
        names.push(CATEGORICAL_FEATURE);
        names
    }

    /// Saves the fitted preprocessor to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if the preprocessor is unfitted, or if serialization
    /// or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if !self.is_fitted() {
            return Err(RendimientoError::config(
                "cannot save an unfitted preprocessor",
            ));
        }
        let bytes = bincode::serialize(self)
            .map_err(|e| RendimientoError::Serialization(format!("preprocessor encode: {e}")))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a fitted preprocessor from a binary file.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails, or if the
    /// stored preprocessor is unfitted.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        let preprocessor: Self = bincode::deserialize(&bytes)
            .map_err(|e| RendimientoError::Serialization(format!("preprocessor decode: {e}")))?;
        if !preprocessor.is_fitted() {
            return Err(RendimientoError::config(
                "loaded preprocessor is not fitted",
            ));
        }
        Ok(preprocessor)
    }
}

/// Builds the (n_records x 5) numeric feature matrix.
fn numeric_matrix(records: &[DerivedRecord]) -> Matrix<f32> {
    let mut data = Vec::with_capacity(records.len() * NUMERIC_FEATURES.len());
    for record in records {
        data.extend_from_slice(&record.numeric_row());
    }
    Matrix::from_vec(records.len(), NUMERIC_FEATURES.len(), data)
        .expect("numeric rows have a fixed width")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawRecord;
    use crate::features::derive_all;

    fn sample_records() -> Vec<DerivedRecord> {
        let raw = vec![
            RawRecord::new(1.0, 50.0, 8.0, 0, "yes").expect("valid record"),
            RawRecord::new(3.0, 60.0, 7.0, 5, "no").expect("valid record"),
            RawRecord::new(5.0, 70.0, 6.0, 10, "yes").expect("valid record"),
            RawRecord::new(7.0, 80.0, 5.0, 15, "no").expect("valid record"),
        ];
        derive_all(&raw)
    }

    #[test]
    fn test_scaler_zero_mean_unit_std() {
        let x = Matrix::from_vec(4, 2, vec![1.0, 100.0, 2.0, 200.0, 3.0, 300.0, 4.0, 400.0])
            .expect("valid dimensions");
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit_transform should succeed");

        let (n_rows, n_cols) = scaled.shape();
        for j in 0..n_cols {
            let col = scaled.column(j);
            assert!(col.mean().abs() < 1e-5, "column {j} mean should be ~0");
            let std = col.variance().sqrt();
            assert!((std - 1.0).abs() < 1e-4, "column {j} std should be ~1");
        }
        assert_eq!(n_rows, 4);
    }

    #[test]
    fn test_scaler_constant_column_does_not_divide() {
        let x = Matrix::from_vec(3, 1, vec![5.0, 5.0, 5.0]).expect("valid dimensions");
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit_transform should succeed");
        // Centered to zero, no division by the zero std
        for i in 0..3 {
            assert_eq!(scaled.get(i, 0), 0.0);
        }
    }

    #[test]
    fn test_scaler_empty_is_config_error() {
        let x = Matrix::from_vec(0, 2, vec![]).expect("valid dimensions");
        let mut scaler = StandardScaler::new();
        assert!(matches!(
            scaler.fit(&x),
            Err(RendimientoError::Config { .. })
        ));
    }

    #[test]
    fn test_scaler_unfitted_transform_fails() {
        let scaler = StandardScaler::new();
        let x = Matrix::zeros(1, 2);
        assert!(scaler.transform(&x).is_err());
    }

    #[test]
    fn test_scaler_dimension_mismatch() {
        let x = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("valid dimensions");
        let mut scaler = StandardScaler::new();
        scaler.fit(&x).expect("fit should succeed");
        let wrong = Matrix::zeros(2, 3);
        assert!(matches!(
            scaler.transform(&wrong),
            Err(RendimientoError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_encoder_sorted_vocabulary() {
        let mut encoder = OneHotEncoder::new();
        encoder
            .fit(&["yes", "no", "yes", "no"])
            .expect("fit should succeed");
        assert_eq!(encoder.categories().expect("fitted"), &["no", "yes"]);
    }

    #[test]
    fn test_encoder_one_hot_rows() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&["yes", "no"]).expect("fit should succeed");
        let encoded = encoder.transform(&["yes", "no"]).expect("transform");
        // Vocabulary is sorted: column 0 = "no", column 1 = "yes"
        assert_eq!(encoded.row(0).as_slice(), &[0.0, 1.0]);
        assert_eq!(encoded.row(1).as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn test_encoder_unseen_category_is_all_zero() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&["yes", "no"]).expect("fit should succeed");
        let encoded = encoder
            .transform(&["sometimes"])
            .expect("unseen value must not error");
        assert_eq!(encoded.row(0).as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn test_encoder_empty_fit_is_config_error() {
        let mut encoder = OneHotEncoder::new();
        let empty: [&str; 0] = [];
        assert!(matches!(
            encoder.fit(&empty),
            Err(RendimientoError::Config { .. })
        ));
    }

    #[test]
    fn test_preprocessor_output_shape() {
        let records = sample_records();
        let mut preprocessor = TablePreprocessor::new();
        let encoded = preprocessor
            .fit_transform(&records)
            .expect("fit_transform should succeed");
        assert_eq!(encoded.shape(), (4, 7));
        assert_eq!(preprocessor.n_output_features().expect("fitted"), 7);
    }

    #[test]
    fn test_preprocessor_numeric_block_standardized() {
        let records = sample_records();
        let mut preprocessor = TablePreprocessor::new();
        let encoded = preprocessor
            .fit_transform(&records)
            .expect("fit_transform should succeed");

        for j in 0..preprocessor.n_numeric() {
            let col = encoded.column(j);
            assert!(col.mean().abs() < 1e-5, "numeric column {j} mean should be ~0");
        }
    }

    #[test]
    fn test_preprocessor_unseen_category_zero_block() {
        let records = sample_records();
        let mut preprocessor = TablePreprocessor::new();
        preprocessor.fit(&records).expect("fit should succeed");

        let raw = RawRecord::new(2.0, 75.0, 7.0, 10, "sometimes").expect("valid record");
        let encoded = preprocessor
            .transform_one(&crate::features::derive(&raw))
            .expect("unseen category must not error");
        assert_eq!(encoded.len(), 7);
        assert_eq!(encoded[5], 0.0);
        assert_eq!(encoded[6], 0.0);
    }

    #[test]
    fn test_preprocessor_empty_fit_is_config_error() {
        let mut preprocessor = TablePreprocessor::new();
        assert!(matches!(
            preprocessor.fit(&[]),
            Err(RendimientoError::Config { .. })
        ));
    }

    #[test]
    fn test_preprocessor_logical_feature_names() {
        let preprocessor = TablePreprocessor::new();
        let names = preprocessor.logical_feature_names();
        assert_eq!(names.len(), 6);
        assert_eq!(names[4], "StudyIntensity");
        assert_eq!(names[5], "Extracurricular Activities");
    }

    #[test]
    fn test_preprocessor_save_load_round_trip() {
        let records = sample_records();
        let mut preprocessor = TablePreprocessor::new();
        let expected = preprocessor
            .fit_transform(&records)
            .expect("fit_transform should succeed");

        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let path = dir.path().join("preprocessor.bin");
        preprocessor.save(&path).expect("save should succeed");

        let loaded = TablePreprocessor::load(&path).expect("load should succeed");
        let actual = loaded.transform(&records).expect("transform should succeed");
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_preprocessor_save_unfitted_fails() {
        let preprocessor = TablePreprocessor::new();
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        assert!(preprocessor.save(dir.path().join("p.bin")).is_err());
    }
}
