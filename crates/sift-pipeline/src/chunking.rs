//! Boundary-aware text chunking
//!
//! Windows of at most `target_size` characters are cut from the text. When a
//! window does not reach the end of the text, the cut is moved back to just
//! after the nearest line break or period, provided that delimiter lies past
//! the configured threshold. Consecutive windows share `overlap` characters.

use crate::config::{BoundaryPreference, BreakThreshold, ChunkingConfig};
use crate::error::SiftError;
use sift_domain::Chunk;

/// Splits document text into ordered, overlapping chunks
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    /// Create a new text chunker, rejecting invalid parameters
    pub fn new(config: ChunkingConfig) -> Result<Self, SiftError> {
        config.validate().map_err(SiftError::Config)?;
        Ok(Self { config })
    }

    /// Chunker settings
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk the given text
    ///
    /// Offsets are in characters. Every character of `text` is covered by at
    /// least one chunk; empty text yields no chunks.
    pub fn chunk(&self, text: &str) -> Result<Vec<Chunk>, SiftError> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        if len == 0 {
            return Ok(Vec::new());
        }

        // Byte position of every character boundary, including the end
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let slice = |start: usize, end: usize| text[bounds[start]..bounds[end]].to_string();

        let target = self.config.target_size;
        let overlap = self.config.overlap;

        if len <= target {
            return Ok(vec![Chunk {
                index: 1,
                start_offset: 0,
                end_offset: len,
                text: text.to_string(),
            }]);
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let candidate = start + target;
            let end = if candidate >= len {
                len
            } else {
                self.boundary_end(&chars, start, candidate)
            };

            chunks.push(Chunk {
                index: chunks.len() + 1,
                start_offset: start,
                end_offset: end,
                text: slice(start, end),
            });

            if end >= len {
                break;
            }

            let next = end - overlap;
            if next <= start {
                return Err(SiftError::Config(format!(
                    "chunking made no progress at offset {} (target_size {}, overlap {})",
                    start, target, overlap
                )));
            }
            start = next;
        }

        Ok(chunks)
    }

    /// End offset for the window `[start, candidate)`
    fn boundary_end(&self, chars: &[char], start: usize, candidate: usize) -> usize {
        let threshold = match self.config.break_threshold {
            BreakThreshold::AnyAfterStart => 1,
            BreakThreshold::PastHalfway => self.config.target_size / 2 + 1,
        };
        // Cutting before `overlap` would keep the next window from advancing
        let min_position = threshold.max(self.config.overlap);

        let delimiters = match self.config.boundary_preference {
            BoundaryPreference::LineBreakFirst => ['\n', '.'],
            BoundaryPreference::PeriodFirst => ['.', '\n'],
        };

        let window = &chars[start..candidate];
        delimiters
            .iter()
            .find_map(|&delimiter| {
                window
                    .iter()
                    .rposition(|&c| c == delimiter)
                    .filter(|&position| position >= min_position)
            })
            .map_or(candidate, |position| start + position + 1)
    }
}
