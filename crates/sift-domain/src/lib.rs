//! Sift Domain Layer
//!
//! Core vocabulary for segmenting report text and sorting the segments into
//! content categories. This crate has ZERO external dependencies and defines the
//! value objects and capability traits every other layer depends upon.
//!
//! ## Key Concepts
//!
//! - **Document**: raw text plus a stable identifier derived from its source
//! - **Chunk**: a bounded, 1-indexed, possibly overlapping slice of a document
//! - **Category**: the closed taxonomy (NARRATIVE, OPERATIONS, FINANCIALS)
//! - **Classification**: the single decision made for one chunk, and who made it
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure value types only
//! - Infrastructure implementations (backends, stores) live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod chunk;
pub mod classification;
pub mod traits;

// Re-exports for convenience
pub use category::Category;
pub use chunk::{Chunk, Document};
pub use classification::{Classification, DecisionSource};
pub use traits::{CategoryStore, DocumentSource, InferenceBackend, InvocationError};
