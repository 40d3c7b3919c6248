//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::Category;
use std::fmt;
use std::time::Duration;

/// Why a single backend invocation did not produce a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The backend did not answer within the allotted time
    Timeout(Duration),

    /// The backend answered with a non-success status
    Failed(String),

    /// The backend or the requested model does not exist
    NotFound(String),

    /// The backend could not be reached at all
    Unavailable(String),
}

impl InvocationError {
    /// Whether retrying against the same backend is pointless
    pub fn is_fatal(&self) -> bool {
        matches!(self, InvocationError::NotFound(_) | InvocationError::Unavailable(_))
    }
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationError::Timeout(d) => write!(f, "timed out after {}s", d.as_secs_f64()),
            InvocationError::Failed(detail) => write!(f, "invocation failed: {}", detail),
            InvocationError::NotFound(what) => write!(f, "not found: {}", what),
            InvocationError::Unavailable(detail) => write!(f, "backend unavailable: {}", detail),
        }
    }
}

impl std::error::Error for InvocationError {}

/// Trait for text-classification backends
///
/// Implemented by the infrastructure layer (sift-llm). Implementations are
/// blocking; callers run them off the async executor.
pub trait InferenceBackend {
    /// Model identifier the backend addresses
    fn model(&self) -> &str;

    /// Send a prompt and return the raw response text
    fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String, InvocationError>;

    /// Check that the backend is reachable and the model is available
    fn probe(&self) -> Result<(), InvocationError> {
        Ok(())
    }

    /// Operator guidance for when the backend is unavailable
    fn remediation(&self) -> Option<String> {
        None
    }
}

/// Trait for reading source documents
///
/// Implemented by the infrastructure layer (sift-store)
pub trait DocumentSource {
    /// Error type for read operations
    type Error;

    /// List the identifiers of every available document
    fn document_ids(&self) -> Result<Vec<String>, Self::Error>;

    /// Read the full text of one document
    fn read(&self, document_id: &str) -> Result<String, Self::Error>;
}

/// Trait for persisting classified text, one logical target per category
///
/// Implemented by the infrastructure layer (sift-store)
pub trait CategoryStore {
    /// Error type for write operations
    type Error;

    /// Persist a single classified chunk
    fn write(
        &mut self,
        category: Category,
        document_id: &str,
        chunk_index: usize,
        text: &str,
    ) -> Result<(), Self::Error>;

    /// Persist the concatenated text of every chunk of one category in a document
    fn write_aggregate(
        &mut self,
        category: Category,
        document_id: &str,
        text: &str,
    ) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors() {
        assert!(InvocationError::NotFound("llama3".into()).is_fatal());
        assert!(InvocationError::Unavailable("connection refused".into()).is_fatal());
        assert!(!InvocationError::Timeout(Duration::from_secs(1)).is_fatal());
        assert!(!InvocationError::Failed("HTTP 500".into()).is_fatal());
    }

    #[test]
    fn test_display() {
        let err = InvocationError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "timed out after 30s");
        let err = InvocationError::Failed("HTTP 500".into());
        assert_eq!(err.to_string(), "invocation failed: HTTP 500");
    }
}
