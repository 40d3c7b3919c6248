//! Map free-form backend answers onto the closed taxonomy

use sift_domain::Category;

/// Label prefixes models like to put before the answer
const LABEL_PREFIXES: &[&str] = &["category", "classification", "label", "result", "answer"];

/// Lexical variants and the category they denote; first contained key wins
const SYNONYMS: &[(&str, Category)] = &[
    ("narrative", Category::Narrative),
    ("financials", Category::Financials),
    ("financial", Category::Financials),
    ("finance", Category::Financials),
    ("operations", Category::Operations),
    ("operational", Category::Operations),
    ("operation", Category::Operations),
];

/// Recover a category from a raw response, or `None` if nothing matches
///
/// Lower-cases, strips a leading `label:` style prefix and all punctuation,
/// then looks for the first synonym contained in what remains.
pub fn normalize_label(response: &str) -> Option<Category> {
    let lowered = response.trim().to_lowercase();
    let unprefixed = strip_label_prefix(&lowered);
    let cleaned: String = unprefixed
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    SYNONYMS
        .iter()
        .find(|(variant, _)| cleaned.contains(variant))
        .map(|(_, category)| *category)
}

fn strip_label_prefix(text: &str) -> &str {
    LABEL_PREFIXES
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix)?.strip_prefix(':'))
        .map_or(text, str::trim_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_labels() {
        assert_eq!(normalize_label("NARRATIVE"), Some(Category::Narrative));
        assert_eq!(normalize_label("financials"), Some(Category::Financials));
        assert_eq!(normalize_label("Operations."), Some(Category::Operations));
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(normalize_label("Financial"), Some(Category::Financials));
        assert_eq!(normalize_label("finance"), Some(Category::Financials));
        assert_eq!(normalize_label("operational"), Some(Category::Operations));
        assert_eq!(normalize_label("Operation!"), Some(Category::Operations));
    }

    #[test]
    fn test_prefixes_and_punctuation() {
        assert_eq!(normalize_label("Category: **Narrative**"), Some(Category::Narrative));
        assert_eq!(normalize_label("answer:financials"), Some(Category::Financials));
        assert_eq!(normalize_label("  Result:   'operations'  \n"), Some(Category::Operations));
    }

    #[test]
    fn test_first_synonym_in_table_order_wins() {
        assert_eq!(
            normalize_label("Not narrative; this is financials"),
            Some(Category::Narrative)
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(normalize_label(""), None);
        assert_eq!(normalize_label("I cannot decide."), None);
        assert_eq!(normalize_label("Category: legal"), None);
    }

    #[test]
    fn test_strip_label_prefix() {
        assert_eq!(strip_label_prefix("label: x"), "x");
        assert_eq!(strip_label_prefix("labels: x"), "labels: x");
        assert_eq!(strip_label_prefix("narrative"), "narrative");
    }
}
