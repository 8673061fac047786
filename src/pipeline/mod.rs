//! Training and inference pipelines.
//!
//! [`TrainingPipeline`] fits the preprocessor and the forest from a labeled
//! CSV dataset and serializes both artifacts. [`InferencePipeline`] loads
//! the artifacts once, draws the background reference sample, and then
//! answers single-record prediction requests with attributions. Loading is
//! the expensive step; a loaded pipeline is immutable and can serve any
//! number of `predict_one` calls.

use crate::data::{self, RawRecord, TrainingSet};
use crate::error::{RendimientoError, Result};
use crate::features::{derive, derive_all, CATEGORICAL_FEATURE, NUMERIC_FEATURES};
use crate::interpret::ShapExplainer;
use crate::metrics::{mse, r_squared};
use crate::model_selection::{sample_indices, train_test_split};
use crate::preprocessing::TablePreprocessor;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use crate::tree::RandomForestRegressor;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// File name of the serialized preprocessor artifact.
pub const PREPROCESSOR_FILE: &str = "preprocessor.bin";
/// File name of the serialized model artifact.
pub const MODEL_FILE: &str = "model.bin";

/// Training hyperparameters.
///
/// The defaults reproduce the reference setup: an 80/20 split and a
/// 100-tree forest, both seeded with 42. Every value is a configurable
/// default rather than a hard invariant.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Fraction of the dataset held out for evaluation.
    pub test_size: f32,
    /// Seed for the train/test shuffle.
    pub split_seed: Option<u64>,
    /// Number of trees in the forest.
    pub n_estimators: usize,
    /// Maximum depth per tree (None = unlimited).
    pub max_depth: Option<usize>,
    /// Seed for the bootstrap draws.
    pub forest_seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            split_seed: Some(42),
            n_estimators: 100,
            max_depth: None,
            forest_seed: Some(42),
        }
    }
}

/// Evaluation metrics reported after training. Informational only; no
/// threshold gates the artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Rows in the training partition.
    pub n_train: usize,
    /// Rows in the held-out partition.
    pub n_test: usize,
    /// Mean squared error on the held-out partition.
    pub mse: f32,
    /// R² on the held-out partition.
    pub r_squared: f32,
}

/// The fitted artifacts plus the evaluation report.
#[derive(Debug)]
pub struct TrainedArtifacts {
    /// Fitted column preprocessor.
    pub preprocessor: TablePreprocessor,
    /// Fitted forest regressor.
    pub model: RandomForestRegressor,
    /// Held-out evaluation metrics.
    pub report: TrainingReport,
}

/// Fits the preprocessor and regressor from a labeled dataset.
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    /// Creates a pipeline with the given hyperparameters.
    #[must_use]
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Loads the dataset, fits both artifacts, and evaluates on the
    /// held-out partition.
    ///
    /// The preprocessor is fitted on the training partition only, so the
    /// held-out metrics see the same statistics inference will.
    ///
    /// # Errors
    ///
    /// Propagates dataset schema violations, degenerate fit conditions,
    /// and dimension mismatches between stages.
    pub fn run<P: AsRef<Path>>(&self, dataset_path: P) -> Result<TrainedArtifacts> {
        let dataset = data::load_training_set(dataset_path)?;
        self.run_on(&dataset)
    }

    /// Same as [`TrainingPipeline::run`], but on an already-loaded dataset.
    ///
    /// # Errors
    ///
    /// Same error contract as [`TrainingPipeline::run`].
    pub fn run_on(&self, dataset: &TrainingSet) -> Result<TrainedArtifacts> {
        let derived = derive_all(&dataset.records);

        let (train_records, test_records, y_train, y_test) = train_test_split(
            &derived,
            &dataset.target,
            self.config.test_size,
            self.config.split_seed,
        )?;

        let mut preprocessor = TablePreprocessor::new();
        preprocessor.fit(&train_records)?;
        let x_train = preprocessor.transform(&train_records)?;
        let x_test = preprocessor.transform(&test_records)?;

        let mut model = RandomForestRegressor::new(self.config.n_estimators);
        if let Some(depth) = self.config.max_depth {
            model = model.with_max_depth(depth);
        }
        if let Some(seed) = self.config.forest_seed {
            model = model.with_random_state(seed);
        }
        model.fit(&x_train, &y_train)?;

        let predictions = model.predict(&x_test)?;
        let report = TrainingReport {
            n_train: y_train.len(),
            n_test: y_test.len(),
            mse: mse(&predictions, &y_test)?,
            r_squared: r_squared(&predictions, &y_test)?,
        };

        Ok(TrainedArtifacts {
            preprocessor,
            model,
            report,
        })
    }

    /// Runs the pipeline and serializes both artifacts into `artifacts_dir`.
    ///
    /// # Errors
    ///
    /// Same error contract as [`TrainingPipeline::run`], plus I/O and
    /// serialization errors while writing the artifacts.
    pub fn run_and_save<P, Q>(&self, dataset_path: P, artifacts_dir: Q) -> Result<TrainingReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let artifacts = self.run(dataset_path)?;
        let dir = artifacts_dir.as_ref();
        fs::create_dir_all(dir)?;
        artifacts.preprocessor.save(dir.join(PREPROCESSOR_FILE))?;
        artifacts.model.save(dir.join(MODEL_FILE))?;
        Ok(artifacts.report)
    }
}

/// Inference-side configuration.
///
/// Defaults match the reference setup: a 50-row background sample and
/// seed 42 everywhere, with six attribution entries reported.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Rows drawn (without replacement) for the background sample.
    pub background_size: usize,
    /// Seed for the background draw.
    pub background_seed: Option<u64>,
    /// Permutations sampled per background row during attribution.
    pub n_permutations: usize,
    /// Seed for the attribution permutation draws.
    pub explain_seed: Option<u64>,
    /// Number of attribution entries reported, largest magnitude first.
    pub top_k: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            background_size: 50,
            background_seed: Some(42),
            n_permutations: 16,
            explain_seed: Some(42),
            top_k: 6,
        }
    }
}

/// One logical feature's signed contribution to a prediction.
#[derive(Debug, Clone, Serialize)]
pub struct Attribution {
    /// Logical feature name (one-hot columns folded under the categorical
    /// feature's name).
    pub feature: String,
    /// Signed contribution relative to the baseline expected value.
    pub value: f32,
}

/// Coarse banding of a predicted performance index for display use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    /// Predicted index below 40.
    NeedsSupport,
    /// Predicted index in [40, 50).
    NeedsImprovement,
    /// Predicted index of 50 or above.
    OnTrack,
}

impl PerformanceBand {
    /// Bands a predicted performance index.
    #[must_use]
    pub fn from_index(value: f32) -> Self {
        if value < 40.0 {
            Self::NeedsSupport
        } else if value < 50.0 {
            Self::NeedsImprovement
        } else {
            Self::OnTrack
        }
    }
}

impl std::fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NeedsSupport => "may need additional support",
            Self::NeedsImprovement => "may need improvement",
            Self::OnTrack => "performing well",
        };
        write!(f, "{label}")
    }
}

/// A prediction response: the value, its baseline, and the top
/// attributions explaining the difference.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Predicted performance index.
    pub value: f32,
    /// Mean prediction over the background sample (attribution baseline).
    pub expected_value: f32,
    /// Top-K attributions ordered by absolute magnitude, descending.
    pub attributions: Vec<Attribution>,
    /// Display banding of the predicted value.
    pub band: PerformanceBand,
}

/// Serves single-record predictions from loaded artifacts.
///
/// Construction is the expensive step (artifact load plus background
/// preparation); a constructed pipeline is read-only and `predict_one` may
/// be called any number of times.
#[derive(Debug)]
pub struct InferencePipeline {
    preprocessor: TablePreprocessor,
    model: RandomForestRegressor,
    explainer: ShapExplainer,
    top_k: usize,
}

impl InferencePipeline {
    /// Builds the pipeline from already-loaded artifacts and the records
    /// the background sample is drawn from.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unfitted artifacts, and
    /// propagates any failure while encoding the background records.
    pub fn from_parts(
        preprocessor: TablePreprocessor,
        model: RandomForestRegressor,
        background_records: &[RawRecord],
        config: &InferenceConfig,
    ) -> Result<Self> {
        if !preprocessor.is_fitted() {
            return Err(RendimientoError::config("preprocessor is not fitted"));
        }
        if !model.is_fitted() {
            return Err(RendimientoError::config("model is not fitted"));
        }

        let derived = derive_all(background_records);
        let encoded = preprocessor.transform(&derived)?;

        let picked = sample_indices(
            encoded.n_rows(),
            config.background_size,
            config.background_seed,
        );
        let background: Vec<Vector<f32>> = picked.iter().map(|&i| encoded.row(i)).collect();

        let mut explainer = ShapExplainer::new(background, |row| predict_row(&model, row))?
            .with_n_permutations(config.n_permutations);
        if let Some(seed) = config.explain_seed {
            explainer = explainer.with_random_state(seed);
        }

        Ok(Self {
            preprocessor,
            model,
            explainer,
            top_k: config.top_k,
        })
    }

    /// Loads both artifacts from `artifacts_dir` and draws the background
    /// sample from the dataset at `dataset_path`.
    ///
    /// # Errors
    ///
    /// Propagates artifact I/O and deserialization errors, dataset schema
    /// violations, and background encoding failures.
    pub fn load<P, Q>(artifacts_dir: P, dataset_path: Q, config: &InferenceConfig) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let dir = artifacts_dir.as_ref();
        let preprocessor = TablePreprocessor::load(dir.join(PREPROCESSOR_FILE))?;
        let model = RandomForestRegressor::load(dir.join(MODEL_FILE))?;
        let records = data::load_records(dataset_path)?;
        Self::from_parts(preprocessor, model, &records, config)
    }

    /// Predicts the performance index for one record and explains it.
    ///
    /// The record is validated first; a malformed record is rejected
    /// before any pipeline stage runs. No internal state is mutated.
    ///
    /// # Errors
    ///
    /// Returns a schema error for an invalid record, and propagates
    /// dimension and computation errors from the downstream stages.
    pub fn predict_one(&self, raw: &RawRecord) -> Result<Prediction> {
        raw.validate()?;

        let derived = derive(raw);
        let encoded = self.preprocessor.transform_one(&derived)?;

        let value = predict_row(&self.model, &encoded)?;
        let contributions = self
            .explainer
            .explain(&encoded, |row| predict_row(&self.model, row))?;

        let mut attributions = self.fold_attributions(&contributions);
        attributions.sort_by(|a, b| {
            b.value
                .abs()
                .partial_cmp(&a.value.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        attributions.truncate(self.top_k);

        Ok(Prediction {
            value,
            expected_value: self.explainer.expected_value(),
            attributions,
            band: PerformanceBand::from_index(value),
        })
    }

    /// The attribution baseline: mean prediction over the background.
    #[must_use]
    pub fn expected_value(&self) -> f32 {
        self.explainer.expected_value()
    }

    /// Folds encoded-column contributions onto the six logical features:
    /// numeric columns map one-to-one, the one-hot block sums under the
    /// categorical feature's name.
    fn fold_attributions(&self, contributions: &Vector<f32>) -> Vec<Attribution> {
        let n_numeric = self.preprocessor.n_numeric();

        let mut folded: Vec<Attribution> = NUMERIC_FEATURES
            .iter()
            .enumerate()
            .map(|(j, name)| Attribution {
                feature: (*name).to_string(),
                value: contributions[j],
            })
            .collect();

        let categorical_total: f32 = (n_numeric..contributions.len())
            .map(|j| contributions[j])
            .sum();
        folded.push(Attribution {
            feature: CATEGORICAL_FEATURE.to_string(),
            value: categorical_total,
        });

        folded
    }
}

/// Runs the model on one encoded row.
fn predict_row(model: &RandomForestRegressor, row: &Vector<f32>) -> Result<f32> {
    let x = Matrix::from_rows(std::slice::from_ref(row))?;
    let predictions = model.predict(&x)?;
    Ok(predictions[0])
}
