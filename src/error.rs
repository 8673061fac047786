//! Error types for rendimiento operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for rendimiento operations.
///
/// Covers the four failure classes of the pipeline: malformed input records
/// (`Schema`), degenerate fit conditions (`Config`), shape mismatches between
/// pipeline stages (`DimensionMismatch`), and attribution engine failures
/// (`Computation`), plus I/O and serialization errors from artifact handling.
///
/// # Examples
///
/// ```
/// use rendimiento::error::RendimientoError;
///
/// let err = RendimientoError::DimensionMismatch {
///     expected: "100x7".to_string(),
///     actual: "100x5".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum RendimientoError {
    /// A record field is missing, unparseable, or out of its valid range.
    Schema {
        /// Field or column name
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Fit or load preconditions are not met (empty dataset, unfitted
    /// transformer, invalid split ratio).
    Config {
        /// Description of the degenerate condition
        message: String,
    },

    /// Matrix/vector shapes don't match between pipeline stages.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// The attribution engine failed; non-retryable.
    Computation {
        /// What the prediction function reported
        message: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Artifact serialization/deserialization error.
    Serialization(String),
}

impl fmt::Display for RendimientoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendimientoError::Schema { field, message } => {
                write!(f, "Schema violation in field '{field}': {message}")
            }
            RendimientoError::Config { message } => {
                write!(f, "Invalid configuration: {message}")
            }
            RendimientoError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            RendimientoError::Computation { message } => {
                write!(f, "Attribution computation failed: {message}")
            }
            RendimientoError::Io(e) => write!(f, "I/O error: {e}"),
            RendimientoError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for RendimientoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RendimientoError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RendimientoError {
    fn from(err: std::io::Error) -> Self {
        RendimientoError::Io(err)
    }
}

impl RendimientoError {
    /// Create a schema error for a named field.
    #[must_use]
    pub fn schema(field: &str, message: impl Into<String>) -> Self {
        Self::Schema {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create a computation error.
    #[must_use]
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, RendimientoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_display() {
        let err = RendimientoError::schema("Sleep Hours", "missing value");
        let msg = err.to_string();
        assert!(msg.contains("Sleep Hours"));
        assert!(msg.contains("missing value"));
    }

    #[test]
    fn test_config_display() {
        let err = RendimientoError::config("cannot fit with zero records");
        assert!(err.to_string().contains("zero records"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = RendimientoError::DimensionMismatch {
            expected: "100x7".to_string(),
            actual: "100x5".to_string(),
        };
        assert!(err.to_string().contains("dimension mismatch"));
        assert!(err.to_string().contains("100x7"));
        assert!(err.to_string().contains("100x5"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = RendimientoError::dimension_mismatch("features", 7, 5);
        let msg = err.to_string();
        assert!(msg.contains("features=7"));
        assert!(msg.contains("5"));
    }

    #[test]
    fn test_computation_display() {
        let err = RendimientoError::computation("prediction function failed");
        assert!(err.to_string().contains("prediction function failed"));
    }

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = RendimientoError::Io(io_err);
        let msg = err.to_string();
        assert!(msg.contains("I/O error") || msg.contains("file not found"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: RendimientoError = io_err.into();
        assert!(matches!(err, RendimientoError::Io(_)));
    }

    #[test]
    fn test_serialization_display() {
        let err = RendimientoError::Serialization("truncated artifact".to_string());
        assert!(err.to_string().contains("Serialization"));
        assert!(err.to_string().contains("truncated artifact"));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = RendimientoError::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_schema() {
        use std::error::Error;
        let err = RendimientoError::schema("Hours Studied", "negative");
        assert!(err.source().is_none());
    }
}
