//! Error types for rendimiento-cli.

use rendimiento::RendimientoError;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Pipeline error (schema, config, dimensions, computation, I/O)
    #[error("{0}")]
    Pipeline(#[from] RendimientoError),

    /// Report serialization failed
    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::Pipeline(RendimientoError::Schema { .. }) => 2,
            Self::Pipeline(RendimientoError::Config { .. }) => 3,
            Self::Pipeline(RendimientoError::DimensionMismatch { .. }) => 4,
            Self::Pipeline(RendimientoError::Computation { .. }) => 5,
            Self::Pipeline(RendimientoError::Io(_)) => 7,
            Self::Pipeline(RendimientoError::Serialization(_)) | Self::Report(_) => 6,
        }
    }
}
