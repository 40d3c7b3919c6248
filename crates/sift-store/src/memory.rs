//! In-memory store, mainly for tests

use crate::StoreError;
use sift_domain::{Category, CategoryStore, DocumentSource};
use std::collections::BTreeMap;

/// A chunk captured by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredChunk {
    /// Bucket the chunk was routed to
    pub category: Category,
    /// Owning document
    pub document_id: String,
    /// 1-based chunk index
    pub chunk_index: usize,
    /// Persisted text
    pub text: String,
}

/// Keeps documents and written artifacts in memory
///
/// Doubles as a `DocumentSource`, so a whole run can be exercised without
/// touching the filesystem. Individual documents can be made unreadable or
/// unwritable to exercise per-document failure handling.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, String>,
    unreadable: Vec<String>,
    unwritable: Vec<String>,
    chunks: Vec<StoredChunk>,
    aggregates: Vec<(Category, String, String)>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a readable document
    pub fn with_document(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(id.into(), text.into());
        self
    }

    /// List `id` as a document but fail every read of it
    pub fn with_unreadable(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.documents.insert(id.clone(), String::new());
        self.unreadable.push(id);
        self
    }

    /// Reject every write for document `id`
    pub fn with_unwritable(mut self, id: impl Into<String>) -> Self {
        self.unwritable.push(id.into());
        self
    }

    /// Chunks written so far, in write order
    pub fn chunks(&self) -> &[StoredChunk] {
        &self.chunks
    }

    /// Chunks written to one category
    pub fn chunks_in(&self, category: Category) -> Vec<&StoredChunk> {
        self.chunks.iter().filter(|c| c.category == category).collect()
    }

    /// Aggregate artifact for a document, if one was written
    pub fn aggregate(&self, category: Category, document_id: &str) -> Option<&str> {
        self.aggregates
            .iter()
            .find(|(c, id, _)| *c == category && id == document_id)
            .map(|(_, _, text)| text.as_str())
    }

    /// Number of aggregate artifacts written
    pub fn aggregate_count(&self) -> usize {
        self.aggregates.len()
    }

    fn check_writable(&self, document_id: &str) -> Result<(), StoreError> {
        if self.unwritable.iter().any(|id| id == document_id) {
            return Err(StoreError::Rejected(format!("document '{}' is read-only", document_id)));
        }
        Ok(())
    }
}

impl DocumentSource for MemoryStore {
    type Error = StoreError;

    fn document_ids(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn read(&self, document_id: &str) -> Result<String, Self::Error> {
        if self.unreadable.iter().any(|id| id == document_id) {
            return Err(StoreError::Rejected(format!("document '{}' is unreadable", document_id)));
        }
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| StoreError::Rejected(format!("no document '{}'", document_id)))
    }
}

impl CategoryStore for MemoryStore {
    type Error = StoreError;

    fn write(
        &mut self,
        category: Category,
        document_id: &str,
        chunk_index: usize,
        text: &str,
    ) -> Result<(), Self::Error> {
        self.check_writable(document_id)?;
        self.chunks.push(StoredChunk {
            category,
            document_id: document_id.to_string(),
            chunk_index,
            text: text.to_string(),
        });
        Ok(())
    }

    fn write_aggregate(
        &mut self,
        category: Category,
        document_id: &str,
        text: &str,
    ) -> Result<(), Self::Error> {
        self.check_writable(document_id)?;
        self.aggregates
            .push((category, document_id.to_string(), text.to_string()));
        Ok(())
    }
}
