//! Classification outcomes

use crate::Category;

/// Which stage produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionSource {
    /// Deterministic keyword rules
    Rule,

    /// External inference backend
    Inference,

    /// No category could be assigned (too short, retries exhausted, unrecognized answer)
    Failure,
}

impl DecisionSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Rule => "rule",
            DecisionSource::Inference => "inference",
            DecisionSource::Failure => "failure",
        }
    }
}

/// The decision made for a single chunk
///
/// Created once per chunk and never mutated. A failure carries no category,
/// so it cannot be persisted into a category bucket by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Index of the classified chunk within its document
    pub chunk_index: usize,

    /// Assigned category, `None` on failure
    pub category: Option<Category>,

    /// Who decided
    pub source: DecisionSource,
}

impl Classification {
    /// Decision made by the rule table
    pub fn by_rule(chunk_index: usize, category: Category) -> Self {
        Self {
            chunk_index,
            category: Some(category),
            source: DecisionSource::Rule,
        }
    }

    /// Decision made by the inference backend
    pub fn by_inference(chunk_index: usize, category: Category) -> Self {
        Self {
            chunk_index,
            category: Some(category),
            source: DecisionSource::Inference,
        }
    }

    /// Terminal failure for the chunk
    pub fn failed(chunk_index: usize) -> Self {
        Self {
            chunk_index,
            category: None,
            source: DecisionSource::Failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_source() {
        let rule = Classification::by_rule(1, Category::Narrative);
        assert_eq!(rule.source, DecisionSource::Rule);
        assert_eq!(rule.category, Some(Category::Narrative));

        let inferred = Classification::by_inference(2, Category::Operations);
        assert_eq!(inferred.source, DecisionSource::Inference);
        assert_eq!(inferred.category, Some(Category::Operations));

        let failed = Classification::failed(3);
        assert_eq!(failed.source, DecisionSource::Failure);
        assert_eq!(failed.category, None);
    }
}
