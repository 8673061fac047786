//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use rendimiento::prelude::*;
//! ```

pub use crate::data::{RawRecord, TrainingSet};
pub use crate::error::{RendimientoError, Result};
pub use crate::features::{derive, derive_all, DerivedRecord};
pub use crate::interpret::ShapExplainer;
pub use crate::metrics::{mse, r_squared};
pub use crate::pipeline::{
    InferenceConfig, InferencePipeline, Prediction, TrainingConfig, TrainingPipeline,
};
pub use crate::preprocessing::{OneHotEncoder, StandardScaler, TablePreprocessor};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::{Estimator, Transformer};
pub use crate::tree::{DecisionTreeRegressor, RandomForestRegressor};
