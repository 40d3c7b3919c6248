//! Documents and the chunks they are split into

/// A source document held in memory for the duration of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Stable identifier derived from the source (e.g. the file stem)
    pub id: String,

    /// Raw UTF-8 text
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the document has no non-whitespace content
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A bounded, contiguous segment of a document
///
/// Offsets are half-open and counted in characters, so
/// `0 <= start_offset < end_offset <= document.char_len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position in the document's chunk sequence
    pub index: usize,

    /// First character covered by this chunk
    pub start_offset: usize,

    /// One past the last character covered by this chunk
    pub end_offset: usize,

    /// The covered text
    pub text: String,
}

impl Chunk {
    /// Number of characters covered
    pub fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}
