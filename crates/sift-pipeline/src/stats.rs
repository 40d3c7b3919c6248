//! Run-level and per-document statistics

use crate::error::SiftError;
use serde::Serialize;
use sift_domain::{Category, Classification, DecisionSource};

/// Chunk counts per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    /// NARRATIVE chunks
    pub narrative: usize,
    /// OPERATIONS chunks
    pub operations: usize,
    /// FINANCIALS chunks
    pub financials: usize,
}

impl CategoryCounts {
    /// Count for one category
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Narrative => self.narrative,
            Category::Operations => self.operations,
            Category::Financials => self.financials,
        }
    }

    /// Add one to a category
    pub fn increment(&mut self, category: Category) {
        match category {
            Category::Narrative => self.narrative += 1,
            Category::Operations => self.operations += 1,
            Category::Financials => self.financials += 1,
        }
    }

    /// Sum over all categories
    pub fn total(&self) -> usize {
        self.narrative + self.operations + self.financials
    }

    /// `(category, count)` pairs in [`Category::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// Outcome of routing one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// Source identifier
    pub document_id: String,
    /// Chunks produced by the chunker
    pub total_chunks: usize,
    /// Chunks that received a category
    pub classified: usize,
    /// Chunks left unclassified
    pub failed: usize,
    /// Decisions made by the rule table
    pub rule_decisions: usize,
    /// Decisions made by the backend
    pub inference_decisions: usize,
    /// Classified chunks per category
    pub distribution: CategoryCounts,
    /// Chunks of the target category (aggregate mode only)
    pub target_chunks: Option<usize>,
    /// Whether an aggregate artifact was written
    pub aggregate_written: bool,
}

impl DocumentReport {
    /// Empty report for a document
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            ..Self::default()
        }
    }

    /// Count one classification
    pub fn record(&mut self, classification: &Classification) {
        match classification.category {
            Some(category) => {
                self.classified += 1;
                self.distribution.increment(category);
            }
            None => self.failed += 1,
        }
        match classification.source {
            DecisionSource::Rule => self.rule_decisions += 1,
            DecisionSource::Inference => self.inference_decisions += 1,
            DecisionSource::Failure => {}
        }
    }
}

/// Counters for a whole run
///
/// Owned by the router and updated once per chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Classified chunks per category
    pub categories: CategoryCounts,
    /// Chunks that could not be classified
    pub failures: usize,
    /// Decisions made by the rule table
    pub rule_decisions: usize,
    /// Decisions made by the backend
    pub inference_decisions: usize,
    /// Documents routed to completion
    pub documents_processed: usize,
    /// Documents abandoned on a read or write error
    pub documents_failed: usize,
    /// Blank documents
    pub documents_skipped: usize,
    /// Chunks seen across all documents
    pub chunks_total: usize,
    /// Wall-clock duration of the run
    pub elapsed_ms: u64,
}

impl RunStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one chunk's classification
    pub fn record(&mut self, classification: &Classification) {
        self.chunks_total += 1;
        match classification.category {
            Some(category) => self.categories.increment(category),
            None => self.failures += 1,
        }
        match classification.source {
            DecisionSource::Rule => self.rule_decisions += 1,
            DecisionSource::Inference => self.inference_decisions += 1,
            DecisionSource::Failure => {}
        }
    }

    /// Record a document that was routed to completion
    pub fn record_document_processed(&mut self) {
        self.documents_processed += 1;
    }

    /// Record a document abandoned on an I/O error
    pub fn record_document_failed(&mut self) {
        self.documents_failed += 1;
    }

    /// Record a blank document
    pub fn record_document_skipped(&mut self) {
        self.documents_skipped += 1;
    }

    /// Classified chunks in one category
    pub fn count(&self, category: Category) -> usize {
        self.categories.get(category)
    }

    /// Classified chunks across all categories
    pub fn total_classified(&self) -> usize {
        self.categories.total()
    }

    /// Generate a summary report of the run
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Classification Summary".to_string(),
            "======================".to_string(),
            format!(
                "Documents: {} processed, {} failed, {} skipped",
                self.documents_processed, self.documents_failed, self.documents_skipped
            ),
            format!("Chunks: {}", self.chunks_total),
            format!("Elapsed: {:.1}s", self.elapsed_ms as f64 / 1000.0),
            String::new(),
            "Chunks by category:".to_string(),
        ];

        for (category, count) in self.categories.iter() {
            lines.push(format!("  {}: {}", category, count));
        }
        lines.push(format!("  FAILED: {}", self.failures));
        lines.push(String::new());
        lines.push(format!(
            "Decisions: {} by rule, {} by inference",
            self.rule_decisions, self.inference_decisions
        ));

        lines.join("\n")
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SiftError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_by_source_and_category() {
        let mut stats = RunStatistics::new();
        stats.record(&Classification::by_rule(1, Category::Narrative));
        stats.record(&Classification::by_inference(2, Category::Financials));
        stats.record(&Classification::by_inference(3, Category::Financials));
        stats.record(&Classification::failed(4));

        assert_eq!(stats.chunks_total, 4);
        assert_eq!(stats.count(Category::Narrative), 1);
        assert_eq!(stats.count(Category::Financials), 2);
        assert_eq!(stats.count(Category::Operations), 0);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.rule_decisions, 1);
        assert_eq!(stats.inference_decisions, 2);
        assert_eq!(stats.total_classified(), 3);
    }

    #[test]
    fn test_document_report() {
        let mut report = DocumentReport::new("10k");
        report.record(&Classification::by_rule(1, Category::Operations));
        report.record(&Classification::failed(2));

        assert_eq!(report.classified, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.distribution.get(Category::Operations), 1);
        assert_eq!(report.rule_decisions, 1);
        assert_eq!(report.inference_decisions, 0);
    }

    #[test]
    fn test_summary_lists_every_category() {
        let mut stats = RunStatistics::new();
        stats.record(&Classification::failed(1));
        stats.record_document_processed();

        let summary = stats.summary();
        assert!(summary.contains("NARRATIVE: 0"));
        assert!(summary.contains("OPERATIONS: 0"));
        assert!(summary.contains("FINANCIALS: 0"));
        assert!(summary.contains("FAILED: 1"));
        assert!(summary.contains("1 processed"));
    }

    #[test]
    fn test_to_json() {
        let mut stats = RunStatistics::new();
        stats.record(&Classification::by_rule(1, Category::Financials));
        let json: serde_json::Value = serde_json::from_str(&stats.to_json().unwrap()).unwrap();
        assert_eq!(json["categories"]["financials"], 1);
        assert_eq!(json["rule_decisions"], 1);
    }
}
