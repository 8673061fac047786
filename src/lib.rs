//! Rendimiento: student exam-performance prediction in pure Rust.
//!
//! Rendimiento predicts a student's performance index from study-habit
//! inputs and explains each prediction with per-feature attributions. The
//! pipeline is: feature derivation → column preprocessing (standardization
//! + one-hot encoding) → bagged-tree regression → Shapley-style attribution
//! against a fixed background sample.
//!
//! # Quick Start
//!
//! ```no_run
//! use rendimiento::data::RawRecord;
//! use rendimiento::pipeline::{
//!     InferenceConfig, InferencePipeline, TrainingConfig, TrainingPipeline,
//! };
//!
//! // Train once: fit preprocessor + forest, serialize both artifacts
//! let report = TrainingPipeline::new(TrainingConfig::default())
//!     .run_and_save("data/students.csv", "artifacts")?;
//! println!("held-out MSE: {:.2}", report.mse);
//!
//! // Load once, predict many times
//! let pipeline =
//!     InferencePipeline::load("artifacts", "data/students.csv", &InferenceConfig::default())?;
//! let record = RawRecord::new(2.0, 75.0, 7.0, 10, "yes")?;
//! let prediction = pipeline.predict_one(&record)?;
//! println!("predicted index: {:.2}", prediction.value);
//! for attribution in &prediction.attributions {
//!     println!("  {}: {:+.3}", attribution.feature, attribution.value);
//! }
//! # Ok::<(), rendimiento::error::RendimientoError>(())
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: Student records and CSV dataset loading
//! - [`features`]: Derived-feature computation (study intensity)
//! - [`preprocessing`]: Column transformers (scaler, encoder, table)
//! - [`tree`]: Decision tree and random forest regressors
//! - [`model_selection`]: Train/test splitting and background sampling
//! - [`metrics`]: Evaluation metrics (MSE, R²)
//! - [`interpret`]: Shapley-style feature attribution
//! - [`pipeline`]: Training and inference orchestration

pub mod data;
pub mod error;
pub mod features;
pub mod interpret;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod traits;
pub mod tree;

pub use error::{RendimientoError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::{Estimator, Transformer};
