//! Error types for the pipeline

use thiserror::Error;

/// Errors that can surface from the pipeline
///
/// Chunk-level problems never appear here: a chunk that cannot be classified
/// is recorded as a failure in the run statistics instead.
#[derive(Error, Debug)]
pub enum SiftError {
    /// Invalid chunking or inference parameters; fatal for the run
    #[error("Configuration error: {0}")]
    Config(String),

    /// A document (or the document listing) could not be read
    #[error("Read error: {0}")]
    Read(String),

    /// A classified chunk or aggregate could not be persisted
    #[error("Write error: {0}")]
    Write(String),

    /// The inference backend is not installed, not running, or lacks the model
    #[error("Inference backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Statistics could not be serialized
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SiftError {
    fn from(e: serde_json::Error) -> Self {
        SiftError::Json(e.to_string())
    }
}
