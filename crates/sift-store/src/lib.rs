//! Sift Storage Layer
//!
//! Implements the `DocumentSource` and `CategoryStore` traits on top of plain
//! directories of UTF-8 text files, plus an in-memory store for tests.
//!
//! # Layout
//!
//! ```text
//! <input>/<document_id>.txt                          documents
//! <output>/<category>/<document_id>_chunk_0001.txt   one file per classified chunk
//! <output>/<category>/<document_id>.txt              aggregate per document
//! <output>/<document_id>_chunk_0001.txt              plain chunk export
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use sift_store::{DirectorySource, DirectoryStore};
//! use sift_domain::DocumentSource;
//!
//! let source = DirectorySource::new("data/extracted_text");
//! let store = DirectoryStore::new("data/classified");
//! for id in source.document_ids().unwrap() {
//!     println!("{}", id);
//! }
//! ```

#![warn(missing_docs)]

mod memory;

use sift_domain::{Category, CategoryStore, DocumentSource};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub use memory::{MemoryStore, StoredChunk};

/// File extension of documents and written artifacts
pub const TEXT_EXTENSION: &str = "txt";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A document or directory could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// An artifact could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Path being written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Write rejected by the store itself
    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// File name of a single chunk: `<document_id>_chunk_NNNN.txt`
pub fn chunk_file_name(document_id: &str, chunk_index: usize) -> String {
    format!("{}_chunk_{:04}.{}", document_id, chunk_index, TEXT_EXTENSION)
}

/// Reads `*.txt` documents from one directory; the document id is the file stem
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source over `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the documents are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, document_id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", document_id, TEXT_EXTENSION))
    }
}

impl DocumentSource for DirectorySource {
    type Error = StoreError;

    fn document_ids(&self) -> Result<Vec<String>, Self::Error> {
        let read_err = |source| StoreError::Read {
            path: self.dir.clone(),
            source,
        };

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(TEXT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn read(&self, document_id: &str) -> Result<String, Self::Error> {
        let path = self.document_path(document_id);
        fs::read_to_string(&path).map_err(|source| StoreError::Read { path, source })
    }
}

/// Writes classified text into one sub-directory per category
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one category's artifacts
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// Write an unclassified chunk directly under the root
    pub fn write_chunk_file(
        &self,
        document_id: &str,
        chunk_index: usize,
        text: &str,
    ) -> Result<PathBuf, StoreError> {
        let path = self.root.join(chunk_file_name(document_id, chunk_index));
        write_file(&path, text)?;
        Ok(path)
    }
}

fn write_file(path: &Path, text: &str) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, text).map_err(write_err)?;
    debug!("Wrote {} ({} bytes)", path.display(), text.len());
    Ok(())
}

impl CategoryStore for DirectoryStore {
    type Error = StoreError;

    fn write(
        &mut self,
        category: Category,
        document_id: &str,
        chunk_index: usize,
        text: &str,
    ) -> Result<(), Self::Error> {
        let path = self
            .category_dir(category)
            .join(chunk_file_name(document_id, chunk_index));
        write_file(&path, text)
    }

    fn write_aggregate(
        &mut self,
        category: Category,
        document_id: &str,
        text: &str,
    ) -> Result<(), Self::Error> {
        let path = self
            .category_dir(category)
            .join(format!("{}.{}", document_id, TEXT_EXTENSION));
        write_file(&path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_file_name_is_zero_padded() {
        assert_eq!(chunk_file_name("deckers_2025", 1), "deckers_2025_chunk_0001.txt");
        assert_eq!(chunk_file_name("a", 12345), "a_chunk_12345.txt");
    }

    #[test]
    fn test_category_dir() {
        let store = DirectoryStore::new("/out");
        assert_eq!(store.category_dir(Category::Financials), PathBuf::from("/out/financials"));
    }

    #[test]
    fn test_missing_directory_is_read_error() {
        let source = DirectorySource::new("/definitely/not/here");
        assert!(matches!(source.document_ids(), Err(StoreError::Read { .. })));
    }
}
