//! Sift Pipeline
//!
//! Splits report text into bounded, overlapping chunks and sorts each chunk
//! into one of the NARRATIVE, OPERATIONS or FINANCIALS buckets.
//!
//! # Architecture
//!
//! ```text
//! DocumentSource → TextChunker → RuleClassifier ─┬─→ CategoryStore
//!                                     │ no rule  │
//!                                     └→ InferenceClassifier → InferenceBackend
//! ```
//!
//! Rules are cheap and deterministic, so every chunk meets them first. Only
//! chunks no rule decides go to the backend, with a timeout, bounded retries
//! and normalization of the free-form answer. Chunks that still end up without
//! a category are counted, never persisted.
//!
//! # Example Usage
//!
//! ```no_run
//! use sift_pipeline::{Router, RoutingMode, SiftConfig};
//! use sift_llm::OllamaBackend;
//! use sift_store::{DirectorySource, DirectoryStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SiftConfig::default();
//! let backend = OllamaBackend::new(&config.inference.endpoint, &config.inference.model);
//! let store = DirectoryStore::new("data/classified");
//!
//! let mut router = Router::new(&config, backend, store, RoutingMode::PerChunk)?;
//! router.inference().probe().await?;
//!
//! let stats = router.run(&DirectorySource::new("data/extracted_text")).await?;
//! println!("{}", stats.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod clean;
mod config;
mod error;
mod inference;
mod normalize;
mod prompt;
mod retry;
mod router;
mod rules;
mod stats;


pub use chunking::TextChunker;
pub use clean::clean_text;
pub use config::{
    BoundaryPreference, BreakThreshold, ChunkingConfig, InferenceConfig, RoutingConfig, SiftConfig,
};
pub use error::SiftError;
pub use inference::{AttemptFailure, InferenceClassifier, InferenceFailure};
pub use normalize::normalize_label;
pub use prompt::{truncate_chars, PromptBuilder, TAXONOMY};
pub use retry::{FailureKind, RetryExhausted, RetryPolicy, Retryable};
pub use router::{Router, RoutingMode};
pub use rules::{Rule, RuleClassifier, DEFAULT_RULES};
pub use stats::{CategoryCounts, DocumentReport, RunStatistics};
