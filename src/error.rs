//! Error types for the detection-map library.

use thiserror::Error;

/// Result type for detection-map operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Error types that can occur while loading or evaluating detections.
///
/// An empty prediction set is not an error: classes without detections
/// simply score an average precision of 0.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Malformed threshold, class count, coordinates or score.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvalError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
