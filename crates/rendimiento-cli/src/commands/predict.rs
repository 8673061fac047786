//! `rendir predict` - predict one student's performance index and explain it.

use crate::error::Result;
use rendimiento::data::RawRecord;
use rendimiento::pipeline::{InferenceConfig, InferencePipeline};
use std::path::Path;
use tracing::{debug, info};

/// Prediction options collected from the command line.
pub(crate) struct PredictOptions {
    pub hours_studied: f32,
    pub previous_scores: f32,
    pub sleep_hours: f32,
    pub sample_papers: u32,
    pub extracurricular: String,
    pub background_size: usize,
    pub background_seed: u64,
    pub top_k: usize,
}

pub(crate) fn run(
    artifacts_dir: &Path,
    dataset: &Path,
    options: &PredictOptions,
    json: bool,
) -> Result<()> {
    let record = RawRecord::new(
        options.hours_studied,
        options.previous_scores,
        options.sleep_hours,
        options.sample_papers,
        &options.extracurricular,
    )?;

    let config = InferenceConfig {
        background_size: options.background_size,
        background_seed: Some(options.background_seed),
        top_k: options.top_k,
        ..InferenceConfig::default()
    };

    info!(
        artifacts = %artifacts_dir.display(),
        background = %dataset.display(),
        "loading inference pipeline"
    );
    let pipeline = InferencePipeline::load(artifacts_dir, dataset, &config)?;
    debug!(expected_value = pipeline.expected_value(), "pipeline ready");

    let prediction = pipeline.predict_one(&record)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        println!("Predicted Performance Index: {:.2}", prediction.value);
        println!("Assessment: student is {}", prediction.band);
        println!();
        println!("Feature influence (baseline {:.2}):", prediction.expected_value);
        for attribution in &prediction.attributions {
            println!("  {:<38} {:+8.3}", attribution.feature, attribution.value);
        }
    }

    Ok(())
}
