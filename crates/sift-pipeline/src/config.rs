//! Configuration for chunking, inference, and routing
//!
//! All tunables travel as an explicit [`SiftConfig`] value handed to the
//! constructors; nothing is read from process-wide state.

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a boundary delimiter must lie before the chunker will cut after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BreakThreshold {
    /// Any delimiter after the first character of the window
    #[default]
    AnyAfterStart,
    /// Only delimiters past the middle of the window
    PastHalfway,
}

/// Which delimiter the chunker looks for first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPreference {
    /// Line break, falling back to a period
    #[default]
    LineBreakFirst,
    /// Period, falling back to a line break
    PeriodFirst,
}

/// Chunking parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk before boundary adjustment
    pub target_size: usize,

    /// Characters shared by consecutive chunks (0 disables overlap)
    pub overlap: usize,

    /// Minimum position of an accepted delimiter
    pub break_threshold: BreakThreshold,

    /// Delimiter search order
    pub boundary_preference: BoundaryPreference,
}

impl ChunkingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.target_size == 0 {
            return Err("target_size must be greater than 0".to_string());
        }
        if self.overlap >= self.target_size {
            return Err(format!(
                "overlap ({}) must be less than target_size ({})",
                self.overlap, self.target_size
            ));
        }
        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_size: 5_000,
            overlap: 500,
            break_threshold: BreakThreshold::AnyAfterStart,
            boundary_preference: BoundaryPreference::LineBreakFirst,
        }
    }
}

/// Inference backend parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Model identifier addressed on the backend
    pub model: String,

    /// Backend API endpoint
    pub endpoint: String,

    /// Characters of a chunk sent to the backend
    pub max_sample_length: usize,

    /// Wall-clock bound on one invocation (milliseconds)
    pub timeout_ms: u64,

    /// Attempts per chunk, including the first
    pub max_retries: u32,

    /// Pause after a failed or unrecognized answer (milliseconds)
    pub retry_delay_ms: u64,

    /// Pause after a timeout (milliseconds)
    pub timeout_retry_delay_ms: u64,
}

impl InferenceConfig {
    /// Get the invocation timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Retry policy described by this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            failure_delay: Duration::from_millis(self.retry_delay_ms),
            timeout_delay: Duration::from_millis(self.timeout_retry_delay_ms),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_sample_length == 0 {
            return Err("max_sample_length must be greater than 0".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "phi3".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            max_sample_length: 900,
            timeout_ms: 180_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
            timeout_retry_delay_ms: 2_000,
        }
    }
}

/// Routing parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Chunks shorter than this after cleaning are failed without classification
    pub min_chunk_length: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            min_chunk_length: 300,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiftConfig {
    /// Chunker settings
    pub chunking: ChunkingConfig,

    /// Inference classifier settings
    pub inference: InferenceConfig,

    /// Router settings
    pub routing: RoutingConfig,
}

impl SiftConfig {
    /// Preset for extracting one category from full documents: small
    /// non-overlapping chunks, no minimum length, short timeouts
    pub fn financials_extraction() -> Self {
        Self {
            chunking: ChunkingConfig {
                target_size: 200,
                overlap: 0,
                break_threshold: BreakThreshold::AnyAfterStart,
                boundary_preference: BoundaryPreference::LineBreakFirst,
            },
            inference: InferenceConfig {
                model: "llama3".to_string(),
                max_sample_length: 200,
                timeout_ms: 30_000,
                ..InferenceConfig::default()
            },
            routing: RoutingConfig {
                min_chunk_length: 0,
            },
        }
    }

    /// Preset matching the plain chunk export: period boundaries past halfway
    pub fn chunk_export() -> Self {
        Self {
            chunking: ChunkingConfig {
                break_threshold: BreakThreshold::PastHalfway,
                boundary_preference: BoundaryPreference::PeriodFirst,
                ..ChunkingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.chunking.validate()?;
        self.inference.validate()?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
