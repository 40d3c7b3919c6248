//! Ollama Backend Implementation
//!
//! Provides integration with Ollama's local HTTP API.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Configurable endpoint and model
//! - Per-request timeout
//! - Availability probe (server reachable, model pulled)
//!
//! Retrying is not done here; the pipeline owns the retry policy.
//!
//! # Examples
//!
//! ```no_run
//! use sift_llm::OllamaBackend;
//!
//! let backend = OllamaBackend::new("http://localhost:11434", "llama3");
//!
//! // `generate` is async; the `InferenceBackend` impl is a blocking wrapper
//! // meant to be called from tokio's blocking pool.
//! ```

use serde::{Deserialize, Serialize};
use sift_domain::{InferenceBackend, InvocationError};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Timeout for the availability probe
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Ollama API backend for local inference
pub struct OllamaBackend {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

/// Response from Ollama tags API (locally available models)
#[derive(Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "phi3")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a new Ollama backend on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// The API endpoint this backend talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// - `Timeout` if no response arrives within `timeout`
    /// - `Unavailable` if Ollama is not running
    /// - `NotFound` if the model has not been pulled
    /// - `Failed` for any other non-success status or malformed body
    pub async fn generate(&self, prompt: &str, timeout: Duration) -> Result<String, InvocationError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e, timeout))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InvocationError::NotFound(format!("model '{}'", self.model)));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InvocationError::Failed(format!("HTTP {}: {}", status, error_text.trim())));
        }

        let body = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| self.map_request_error(e, timeout))?;

        debug!(model = %self.model, len = body.response.len(), "Ollama responded");
        Ok(body.response)
    }

    /// Check that the server answers and the model has been pulled
    pub async fn check_available(&self) -> Result<(), InvocationError> {
        let url = format!("{}/api/tags", self.endpoint);
        let timeout = Duration::from_secs(PROBE_TIMEOUT_SECS);

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| InvocationError::Unavailable(format!("{}: {}", self.endpoint, e)))?;

        if !response.status().is_success() {
            return Err(InvocationError::Unavailable(format!(
                "{} answered HTTP {}",
                self.endpoint,
                response.status()
            )));
        }

        let tags = response
            .json::<OllamaTagsResponse>()
            .await
            .map_err(|e| InvocationError::Failed(format!("Failed to parse model list: {}", e)))?;

        let names: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
        if model_is_listed(&self.model, &names) {
            Ok(())
        } else {
            Err(InvocationError::NotFound(format!("model '{}' has not been pulled", self.model)))
        }
    }

    fn map_request_error(&self, e: reqwest::Error, timeout: Duration) -> InvocationError {
        if e.is_timeout() {
            InvocationError::Timeout(timeout)
        } else if e.is_connect() {
            InvocationError::Unavailable(format!("{}: {}", self.endpoint, e))
        } else if e.is_decode() {
            InvocationError::Failed(format!("Failed to parse response: {}", e))
        } else {
            InvocationError::Failed(format!("Request failed: {}", e))
        }
    }

    /// Drive an async call to completion from blocking code
    ///
    /// Inside tokio's blocking pool the ambient runtime is reused; outside of
    /// any runtime a single-threaded one is started for the call.
    fn block_on<F: Future>(&self, fut: F) -> Result<F::Output, InvocationError> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Ok(handle.block_on(fut)),
            Err(_) => {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| InvocationError::Unavailable(format!("Failed to start runtime: {}", e)))?;
                Ok(runtime.block_on(fut))
            }
        }
    }
}

/// Ollama lists models as `name:tag`; an untagged name matches any tag
fn model_is_listed(model: &str, names: &[String]) -> bool {
    names.iter().any(|name| {
        name == model
            || name
                .strip_prefix(model)
                .map_or(false, |rest| rest.starts_with(':'))
    })
}

impl InferenceBackend for OllamaBackend {
    fn model(&self) -> &str {
        &self.model
    }

    fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String, InvocationError> {
        self.block_on(self.generate(prompt, timeout))?
    }

    fn probe(&self) -> Result<(), InvocationError> {
        self.block_on(self.check_available())?
    }

    fn remediation(&self) -> Option<String> {
        Some(format!(
            "1. Install Ollama from https://ollama.ai\n\
             2. Start the server: open the Ollama app or run `ollama serve` ({})\n\
             3. Pull the model: `ollama pull {}`",
            self.endpoint, self.model
        ))
    }
}
