//! Inference fallback classifier
//!
//! Wraps an [`InferenceBackend`] with prompt construction, a per-attempt
//! timeout, label normalization and the shared retry policy. Once the backend
//! reports that it (or its model) does not exist, the classifier stops calling
//! it for the rest of the run.

use crate::config::InferenceConfig;
use crate::error::SiftError;
use crate::normalize::normalize_label;
use crate::prompt::PromptBuilder;
use crate::retry::{FailureKind, RetryExhausted, RetryPolicy, Retryable};
use sift_domain::{Category, InferenceBackend, InvocationError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Why a single attempt produced no category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// No answer within the configured timeout
    Timeout(Duration),
    /// The backend reported an error
    Invocation(InvocationError),
    /// The answer named no known category
    Unrecognized(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Timeout(d) => write!(f, "timed out after {}s", d.as_secs_f64()),
            AttemptFailure::Invocation(e) => write!(f, "{}", e),
            AttemptFailure::Unrecognized(raw) => write!(f, "unrecognized answer {:?}", raw.trim()),
        }
    }
}

impl Retryable for AttemptFailure {
    fn failure_kind(&self) -> FailureKind {
        match self {
            AttemptFailure::Timeout(_) => FailureKind::Timeout,
            AttemptFailure::Invocation(e) if e.is_fatal() => FailureKind::Fatal,
            AttemptFailure::Invocation(InvocationError::Timeout(_)) => FailureKind::Timeout,
            AttemptFailure::Invocation(_) | AttemptFailure::Unrecognized(_) => {
                FailureKind::Transient
            }
        }
    }
}

/// Terminal outcome of a chunk the backend could not classify
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceFailure {
    /// Every attempt failed
    #[error("no category after {attempts} attempt(s): {last}")]
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Failure of the final attempt
        last: AttemptFailure,
    },

    /// The backend is unavailable; no invocation was made or retried
    #[error("inference backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// Classifies text through an external backend
pub struct InferenceClassifier<B> {
    backend: Arc<B>,
    config: InferenceConfig,
    retry: RetryPolicy,
    unavailable: AtomicBool,
}

impl<B> InferenceClassifier<B>
where
    B: InferenceBackend + Send + Sync + 'static,
{
    /// Create a classifier; fails if `config` is invalid
    pub fn new(backend: B, config: InferenceConfig) -> Result<Self, SiftError> {
        config.validate().map_err(SiftError::Config)?;
        let retry = config.retry_policy();

        Ok(Self {
            backend: Arc::new(backend),
            config,
            retry,
            unavailable: AtomicBool::new(false),
        })
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Active configuration
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Whether a fatal backend error has been seen during this run
    pub fn is_backend_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }

    /// Check the backend before a run
    ///
    /// On failure the classifier is latched unavailable and the error carries
    /// the backend's remediation guidance.
    pub async fn probe(&self) -> Result<(), SiftError> {
        let backend = Arc::clone(&self.backend);
        let outcome = tokio::task::spawn_blocking(move || backend.probe())
            .await
            .map_err(|e| SiftError::BackendUnavailable(format!("Task join error: {}", e)))?;

        match outcome {
            Ok(()) => {
                info!(model = self.backend.model(), "Inference backend is available");
                Ok(())
            }
            Err(e) => {
                self.mark_unavailable(&e);
                Err(SiftError::BackendUnavailable(self.describe_unavailable(&e)))
            }
        }
    }

    /// Classify `text`, retrying per the configured policy
    ///
    /// `text` is cut to `max_sample_length` characters before it is sent.
    pub async fn classify(&self, text: &str) -> Result<Category, InferenceFailure> {
        if self.is_backend_unavailable() {
            debug!("Backend marked unavailable, skipping inference");
            return Err(InferenceFailure::BackendUnavailable(
                self.backend.model().to_string(),
            ));
        }

        let prompt = PromptBuilder::new(text, self.config.max_sample_length).build();
        let prompt = prompt.as_str();
        let max_attempts = self.retry.max_attempts.max(1);

        let outcome = self
            .retry
            .run(move |attempt| self.attempt(prompt, attempt, max_attempts))
            .await;

        match outcome {
            Ok(category) => Ok(category),
            Err(RetryExhausted {
                last_error: AttemptFailure::Invocation(e),
                ..
            }) if e.is_fatal() => Err(InferenceFailure::BackendUnavailable(e.to_string())),
            Err(RetryExhausted {
                attempts,
                last_error,
            }) => {
                warn!(attempts, error = %last_error, "Inference gave up");
                Err(InferenceFailure::Exhausted {
                    attempts,
                    last: last_error,
                })
            }
        }
    }

    async fn attempt(
        &self,
        prompt: &str,
        attempt: u32,
        max_attempts: u32,
    ) -> Result<Category, AttemptFailure> {
        let timeout = self.config.timeout();
        let mut call = self.invoke(prompt);

        let response = match tokio::time::timeout(timeout, &mut call).await {
            Err(_) => {
                // A blocking call cannot be interrupted. The backend was handed
                // the same timeout, so a detached call ends on its own; abort
                // only stops one still queued for a blocking thread.
                call.abort();
                debug!(attempt, max_attempts, "Backend did not answer within {:?}", timeout);
                return Err(AttemptFailure::Timeout(timeout));
            }
            Ok(Err(join_error)) => {
                return Err(AttemptFailure::Invocation(InvocationError::Failed(format!(
                    "Task join error: {}",
                    join_error
                ))));
            }
            Ok(Ok(Err(e))) => {
                debug!(attempt, max_attempts, error = %e, "Backend invocation failed");
                if e.is_fatal() {
                    self.mark_unavailable(&e);
                }
                return Err(AttemptFailure::Invocation(e));
            }
            Ok(Ok(Ok(response))) => response,
        };

        debug!(attempt, max_attempts, response = %response.trim(), "Backend answered");

        match normalize_label(&response) {
            Some(category) => Ok(category),
            None => Err(AttemptFailure::Unrecognized(response)),
        }
    }

    /// Run the blocking backend call off the async executor
    fn invoke(&self, prompt: &str) -> JoinHandle<Result<String, InvocationError>> {
        let backend = Arc::clone(&self.backend);
        let prompt = prompt.to_string();
        let timeout = self.config.timeout();

        tokio::task::spawn_blocking(move || backend.invoke(&prompt, timeout))
    }

    fn mark_unavailable(&self, cause: &InvocationError) {
        if !self.unavailable.swap(true, Ordering::SeqCst) {
            error!("{}", self.describe_unavailable(cause));
        }
    }

    fn describe_unavailable(&self, cause: &InvocationError) -> String {
        match self.backend.remediation() {
            Some(help) => format!("{}\n{}", cause, help),
            None => cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_llm::MockBackend;
    use std::time::Instant;

    fn fast_config() -> InferenceConfig {
        InferenceConfig {
            max_retries: 3,
            retry_delay_ms: 5,
            timeout_retry_delay_ms: 20,
            ..InferenceConfig::default()
        }
    }

    fn classifier(backend: MockBackend) -> InferenceClassifier<MockBackend> {
        InferenceClassifier::new(backend, fast_config()).unwrap()
    }

    #[tokio::test]
    async fn test_normalizes_backend_answer() {
        let classifier = classifier(MockBackend::new("Operations."));
        let category = classifier
            .classify("Our supply chain spans twelve countries.")
            .await
            .unwrap();
        assert_eq!(category, Category::Operations);
        assert_eq!(classifier.backend().call_count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_truncated_sample() {
        let config = InferenceConfig {
            max_sample_length: 10,
            ..fast_config()
        };
        let classifier = InferenceClassifier::new(MockBackend::new("narrative"), config).unwrap();
        classifier.classify("0123456789-REMAINDER").await.unwrap();

        let prompts = classifier.backend().prompts();
        assert!(prompts[0].contains("0123456789"));
        assert!(!prompts[0].contains("REMAINDER"));
    }

    #[tokio::test]
    async fn test_timeouts_exhaust_retries() {
        let backend = MockBackend::failing(InvocationError::Timeout(Duration::from_secs(180)));
        let classifier = classifier(backend);

        let started = Instant::now();
        let err = classifier.classify("ambiguous text").await.unwrap_err();

        assert!(matches!(err, InferenceFailure::Exhausted { attempts: 3, .. }));
        assert_eq!(classifier.backend().call_count(), 3);
        // Two timeout pauses between three attempts
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert!(!classifier.is_backend_unavailable());
    }

    #[tokio::test]
    async fn test_unanswered_calls_time_out_and_exhaust_retries() {
        let config = InferenceConfig {
            timeout_ms: 50,
            max_retries: 2,
            ..fast_config()
        };
        let backend = MockBackend::new("narrative").with_latency(Duration::from_millis(500));
        let classifier = InferenceClassifier::new(backend, config).unwrap();

        let started = Instant::now();
        let err = classifier.classify("ambiguous text").await.unwrap_err();
        let elapsed = started.elapsed();

        assert_eq!(
            err,
            InferenceFailure::Exhausted {
                attempts: 2,
                last: AttemptFailure::Timeout(Duration::from_millis(50)),
            }
        );
        assert_eq!(classifier.backend().call_count(), 2);
        // Two timeouts with one 20ms timeout pause between them
        assert!(elapsed >= Duration::from_millis(120));
        // Neither attempt waited for the stalled call
        assert!(elapsed < Duration::from_millis(450));
        assert!(!classifier.is_backend_unavailable());
    }

    #[tokio::test]
    async fn test_unrecognized_answer_is_retried() {
        let backend = MockBackend::new("financial");
        backend.push_response("I am not sure");
        backend.push_error(InvocationError::Failed("HTTP 500".into()));
        let classifier = classifier(backend);

        let category = classifier.classify("text").await.unwrap();
        assert_eq!(category, Category::Financials);
        assert_eq!(classifier.backend().call_count(), 3);
    }

    #[tokio::test]
    async fn test_unrecognized_every_time_fails() {
        let classifier = classifier(MockBackend::new("legal"));
        let err = classifier.classify("text").await.unwrap_err();
        assert_eq!(
            err,
            InferenceFailure::Exhausted {
                attempts: 3,
                last: AttemptFailure::Unrecognized("legal".into())
            }
        );
    }

    #[tokio::test]
    async fn test_missing_model_latches_unavailable() {
        let backend = MockBackend::failing(InvocationError::NotFound("model 'phi3'".into()));
        let classifier = classifier(backend);

        let first = classifier.classify("text").await.unwrap_err();
        assert!(matches!(first, InferenceFailure::BackendUnavailable(_)));
        assert_eq!(classifier.backend().call_count(), 1);
        assert!(classifier.is_backend_unavailable());

        let second = classifier.classify("more text").await.unwrap_err();
        assert!(matches!(second, InferenceFailure::BackendUnavailable(_)));
        assert_eq!(classifier.backend().call_count(), 1);
    }

    #[tokio::test]
    async fn test_probe_failure_latches_unavailable() {
        let backend = MockBackend::new("narrative")
            .with_probe_error(InvocationError::Unavailable("connection refused".into()));
        let classifier = classifier(backend);

        let err = classifier.probe().await.unwrap_err();
        assert!(matches!(err, SiftError::BackendUnavailable(_)));
        assert!(classifier.is_backend_unavailable());

        assert!(classifier.classify("text").await.is_err());
        assert_eq!(classifier.backend().call_count(), 0);
    }

    #[tokio::test]
    async fn test_probe_success() {
        let classifier = classifier(MockBackend::default());
        assert!(classifier.probe().await.is_ok());
        assert!(!classifier.is_backend_unavailable());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = InferenceConfig {
            max_sample_length: 0,
            ..InferenceConfig::default()
        };
        assert!(matches!(
            InferenceClassifier::new(MockBackend::default(), config),
            Err(SiftError::Config(_))
        ));
    }

    #[test]
    fn test_failure_kinds() {
        let timeout = AttemptFailure::Timeout(Duration::from_secs(1));
        assert_eq!(timeout.failure_kind(), FailureKind::Timeout);

        let backend_timeout =
            AttemptFailure::Invocation(InvocationError::Timeout(Duration::from_secs(1)));
        assert_eq!(backend_timeout.failure_kind(), FailureKind::Timeout);

        let missing = AttemptFailure::Invocation(InvocationError::NotFound("x".into()));
        assert_eq!(missing.failure_kind(), FailureKind::Fatal);

        let garbled = AttemptFailure::Unrecognized("??".into());
        assert_eq!(garbled.failure_kind(), FailureKind::Transient);
    }
}
