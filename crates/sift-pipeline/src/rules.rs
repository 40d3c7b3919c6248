//! Deterministic keyword rules
//!
//! The table is ordered: the first rule with any phrase contained in the
//! lower-cased text decides. Matching is plain substring containment.

use sift_domain::Category;

/// One category and the phrases that select it
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Category assigned on a match
    pub category: Category,
    /// Lower-case phrases
    pub phrases: &'static [&'static str],
}

/// Default rule table, in priority order
pub const DEFAULT_RULES: &[Rule] = &[
    // CEO letters, board messages
    Rule {
        category: Category::Narrative,
        phrases: &["dear stockholders", "chief executive officer"],
    },
    // Statements, per-share data, market risk disclosures
    Rule {
        category: Category::Financials,
        phrases: &[
            "consolidated statements",
            "balance sheet",
            "cash flows",
            "income statement",
            "consolidated balance",
            "earnings per share",
            "net income",
            "fair value",
            "interest rate",
            "foreign currency",
            "consolidated statements of comprehensive income",
        ],
    },
    // Business overview, MD&A, form boilerplate, properties
    Rule {
        category: Category::Operations,
        phrases: &[
            "form 10-k",
            "item 1. business",
            "management's discussion and analysis",
            "md&a",
            "item 2. properties",
            "table of contents",
            "risk factors",
            "business overview",
            "item 1a. risk factors",
            "cybersecurity",
        ],
    },
];

/// Pure keyword classifier; performs no I/O
#[derive(Debug, Clone, Copy)]
pub struct RuleClassifier {
    rules: &'static [Rule],
}

impl RuleClassifier {
    /// Classifier over [`DEFAULT_RULES`]
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES)
    }

    /// Classifier over a custom ordered table
    pub fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    /// Category of the first matching rule, or `None` when no rule applies
    pub fn classify(&self, text: &str) -> Option<Category> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.phrases.iter().any(|phrase| lowered.contains(phrase)))
            .map(|rule| rule.category)
    }

    /// Like [`classify`](Self::classify), with an explicit catch-all
    pub fn classify_or(&self, text: &str, fallback: Category) -> Category {
        self.classify(text).unwrap_or(fallback)
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new()
    }
}
