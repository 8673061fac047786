//! `rendir train` - fit the preprocessor and forest, serialize artifacts.

use crate::error::Result;
use rendimiento::pipeline::{TrainingConfig, TrainingPipeline};
use std::path::Path;
use tracing::info;

/// Training options collected from the command line.
pub(crate) struct TrainOptions {
    pub test_size: f32,
    pub split_seed: u64,
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub forest_seed: u64,
}

pub(crate) fn run(
    dataset: &Path,
    artifacts_dir: &Path,
    options: &TrainOptions,
    json: bool,
) -> Result<()> {
    let config = TrainingConfig {
        test_size: options.test_size,
        split_seed: Some(options.split_seed),
        n_estimators: options.n_estimators,
        max_depth: options.max_depth,
        forest_seed: Some(options.forest_seed),
    };

    info!(
        dataset = %dataset.display(),
        n_estimators = config.n_estimators,
        test_size = config.test_size,
        "training pipeline starting"
    );

    let report = TrainingPipeline::new(config).run_and_save(dataset, artifacts_dir)?;

    info!(
        artifacts = %artifacts_dir.display(),
        mse = report.mse,
        r_squared = report.r_squared,
        "artifacts written"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Trained on {} rows, evaluated on {}", report.n_train, report.n_test);
        println!("Mean Squared Error: {:.2}", report.mse);
        println!("R²: {:.4}", report.r_squared);
        println!("Artifacts written to {}", artifacts_dir.display());
    }

    Ok(())
}
