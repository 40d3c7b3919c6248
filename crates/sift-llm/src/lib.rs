//! Sift Inference Backends
//!
//! Implementations of the `InferenceBackend` trait from `sift-domain`.
//!
//! # Backends
//!
//! - `MockBackend`: Deterministic scripted backend for testing
//! - `OllamaBackend`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use sift_llm::MockBackend;
//! use sift_domain::InferenceBackend;
//! use std::time::Duration;
//!
//! let backend = MockBackend::new("financials");
//! let result = backend.invoke("classify this", Duration::from_secs(1)).unwrap();
//! assert_eq!(result, "financials");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use sift_domain::{InferenceBackend, InvocationError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use ollama::OllamaBackend;

/// Mock backend for deterministic testing
///
/// Scripted outcomes are consumed in order, one per invocation; once the
/// script is empty every call returns the default response. No network
/// calls are made.
///
/// # Examples
///
/// ```
/// use sift_llm::MockBackend;
/// use sift_domain::{InferenceBackend, InvocationError};
/// use std::time::Duration;
///
/// let backend = MockBackend::new("narrative");
/// backend.push_error(InvocationError::Timeout(Duration::from_secs(1)));
///
/// assert!(backend.invoke("p", Duration::from_secs(1)).is_err());
/// assert_eq!(backend.invoke("p", Duration::from_secs(1)).unwrap(), "narrative");
/// assert_eq!(backend.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    model: String,
    default_outcome: Result<String, InvocationError>,
    script: Arc<Mutex<VecDeque<Result<String, InvocationError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    probe_outcome: Result<(), InvocationError>,
    latency: Duration,
}

impl MockBackend {
    /// Create a mock that answers every prompt with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(Ok(response.into()))
    }

    /// Create a mock that fails every invocation with `error`
    pub fn failing(error: InvocationError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(default_outcome: Result<String, InvocationError>) -> Self {
        Self {
            model: "mock".to_string(),
            default_outcome,
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            probe_outcome: Ok(()),
            latency: Duration::ZERO,
        }
    }

    /// Make `probe` report the given error
    pub fn with_probe_error(mut self, error: InvocationError) -> Self {
        self.probe_outcome = Err(error);
        self
    }

    /// Block every invocation for `latency` before answering
    ///
    /// The mock ignores the timeout it is given, so a latency above the
    /// caller's timeout simulates a backend that never answers in time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a response for the next unscripted invocation
    pub fn push_response(&self, response: impl Into<String>) {
        self.lock_script().push_back(Ok(response.into()));
    }

    /// Queue an error for the next unscripted invocation
    pub fn push_error(&self, error: InvocationError) {
        self.lock_script().push_back(Err(error));
    }

    /// Get the number of times invoke was called
    pub fn call_count(&self) -> usize {
        self.lock_prompts().len()
    }

    /// Every prompt received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.lock_prompts().clone()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, InvocationError>>> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_prompts(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.prompts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("operations")
    }
}

impl InferenceBackend for MockBackend {
    fn model(&self) -> &str {
        &self.model
    }

    fn invoke(&self, prompt: &str, _timeout: Duration) -> Result<String, InvocationError> {
        self.lock_prompts().push(prompt.to_string());

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        match self.lock_script().pop_front() {
            Some(outcome) => outcome,
            None => self.default_outcome.clone(),
        }
    }

    fn probe(&self) -> Result<(), InvocationError> {
        self.probe_outcome.clone()
    }

    fn remediation(&self) -> Option<String> {
        Some("the mock backend was configured to fail".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_secs(1);

    #[test]
    fn test_mock_backend_default() {
        let backend = MockBackend::new("Operations.");
        assert_eq!(backend.invoke("any prompt", T).unwrap(), "Operations.");
        assert_eq!(backend.model(), "mock");
    }

    #[test]
    fn test_mock_backend_script_consumed_in_order() {
        let backend = MockBackend::default();
        backend.push_response("first");
        backend.push_error(InvocationError::Failed("HTTP 500".into()));
        backend.push_response("third");

        assert_eq!(backend.invoke("a", T).unwrap(), "first");
        assert!(matches!(backend.invoke("b", T), Err(InvocationError::Failed(_))));
        assert_eq!(backend.invoke("c", T).unwrap(), "third");
        assert_eq!(backend.invoke("d", T).unwrap(), "operations");
    }

    #[test]
    fn test_mock_backend_records_prompts() {
        let backend = MockBackend::new("x");
        backend.invoke("prompt1", T).unwrap();
        backend.invoke("prompt2", T).unwrap();

        assert_eq!(backend.call_count(), 2);
        assert_eq!(backend.prompts(), vec!["prompt1", "prompt2"]);
    }

    #[test]
    fn test_mock_backend_failing() {
        let backend = MockBackend::failing(InvocationError::Timeout(T));
        for _ in 0..3 {
            assert_eq!(backend.invoke("p", T), Err(InvocationError::Timeout(T)));
        }
    }

    #[test]
    fn test_mock_backend_probe() {
        assert!(MockBackend::default().probe().is_ok());
        let backend = MockBackend::default()
            .with_probe_error(InvocationError::Unavailable("down".into()));
        assert!(backend.probe().is_err());
    }

    #[test]
    fn test_mock_backend_latency() {
        let backend = MockBackend::new("narrative").with_latency(Duration::from_millis(30));
        let started = std::time::Instant::now();
        assert_eq!(backend.invoke("p", T).unwrap(), "narrative");
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_mock_backend_clone_shares_state() {
        let backend1 = MockBackend::new("test");
        let backend2 = backend1.clone();

        backend1.invoke("test", T).unwrap();

        assert_eq!(backend1.call_count(), 1);
        assert_eq!(backend2.call_count(), 1);
    }
}
