//! Error types for the prediksi service

use thiserror::Error;

/// Result type alias for prediksi operations
pub type Result<T> = std::result::Result<T, PrediksiError>;

/// Main error type for the prediksi crate
#[derive(Error, Debug)]
pub enum PrediksiError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Pipeline not fitted")]
    NotFitted,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<polars::error::PolarsError> for PrediksiError {
    fn from(err: polars::error::PolarsError) -> Self {
        PrediksiError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PrediksiError {
    fn from(err: serde_json::Error) -> Self {
        PrediksiError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PrediksiError {
    fn from(err: ndarray::ShapeError) -> Self {
        PrediksiError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrediksiError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PrediksiError = io_err.into();
        assert!(matches!(err, PrediksiError::IoError(_)));
    }
}
