//! rendir - student performance prediction CLI
//!
//! Usage:
//!   rendir train --dataset data/students.csv --artifacts ./artifacts
//!   rendir predict --artifacts ./artifacts --dataset data/students.csv \
//!       --hours-studied 2 --previous-scores 75 --sleep-hours 7 \
//!       --sample-papers 10 --extracurricular yes

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::{predict, train};

/// rendir - Student Performance Prediction Tool
///
/// Train the prediction pipeline and explain single predictions.
#[derive(Parser)]
#[command(name = "rendir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the preprocessor and forest, then serialize both artifacts
    Train {
        /// Path to the labeled training CSV
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,

        /// Directory the artifacts are written to
        #[arg(long, default_value = "./artifacts")]
        artifacts: PathBuf,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_size: f32,

        /// Seed for the train/test shuffle
        #[arg(long, default_value = "42")]
        split_seed: u64,

        /// Number of trees in the forest
        #[arg(long, default_value = "100")]
        n_estimators: usize,

        /// Maximum depth per tree (unlimited when omitted)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Seed for the bootstrap draws
        #[arg(long, default_value = "42")]
        forest_seed: u64,
    },

    /// Predict one student's performance index and explain it
    Predict {
        /// Directory holding the serialized artifacts
        #[arg(long, default_value = "./artifacts")]
        artifacts: PathBuf,

        /// Training CSV the background sample is drawn from
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,

        /// Hours studied per day
        #[arg(long)]
        hours_studied: f32,

        /// Previous exam score (0-100)
        #[arg(long)]
        previous_scores: f32,

        /// Sleep hours per day
        #[arg(long)]
        sleep_hours: f32,

        /// Sample question papers practiced
        #[arg(long)]
        sample_papers: u32,

        /// Extracurricular activities (yes/no)
        #[arg(long)]
        extracurricular: String,

        /// Background sample size for attribution
        #[arg(long, default_value = "50")]
        background_size: usize,

        /// Seed for the background draw
        #[arg(long, default_value = "42")]
        background_seed: u64,

        /// Number of attributions to report
        #[arg(long, default_value = "6")]
        top_k: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "rendimiento=debug,rendimiento_cli=debug,info"
    } else {
        "rendimiento=info,rendimiento_cli=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Train {
            dataset,
            artifacts,
            test_size,
            split_seed,
            n_estimators,
            max_depth,
            forest_seed,
        } => train::run(
            &dataset,
            &artifacts,
            &train::TrainOptions {
                test_size,
                split_seed,
                n_estimators,
                max_depth,
                forest_seed,
            },
            cli.json,
        ),

        Commands::Predict {
            artifacts,
            dataset,
            hours_studied,
            previous_scores,
            sleep_hours,
            sample_papers,
            extracurricular,
            background_size,
            background_seed,
            top_k,
        } => predict::run(
            &artifacts,
            &dataset,
            &predict::PredictOptions {
                hours_studied,
                previous_scores,
                sleep_hours,
                sample_papers,
                extracurricular,
                background_size,
                background_seed,
                top_k,
            },
            cli.json,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
