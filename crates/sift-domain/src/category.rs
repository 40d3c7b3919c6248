//! Category module - the closed classification taxonomy

use std::fmt;

/// Content category of a report segment
///
/// The set is closed. A failed classification is not a category; it is
/// represented by the absence of one (see [`crate::Classification`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Executive letters, company overview, strategic vision, brand story
    Narrative,

    /// Business operations, supply chain, manufacturing, distribution
    Operations,

    /// Financial statements, accounting data, ratios, per-share figures
    Financials,
}

impl Category {
    /// Every category, in reporting order
    pub const ALL: [Category; 3] = [Category::Narrative, Category::Operations, Category::Financials];

    /// Canonical upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Narrative => "NARRATIVE",
            Category::Operations => "OPERATIONS",
            Category::Financials => "FINANCIALS",
        }
    }

    /// Lower-case name used for output buckets
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Narrative => "narrative",
            Category::Operations => "operations",
            Category::Financials => "financials",
        }
    }

    /// Parse a canonical label, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "narrative" => Some(Category::Narrative),
            "operations" => Some(Category::Operations),
            "financials" => Some(Category::Financials),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_as_str() {
        assert_eq!(Category::Narrative.as_str(), "NARRATIVE");
        assert_eq!(Category::Operations.as_str(), "OPERATIONS");
        assert_eq!(Category::Financials.as_str(), "FINANCIALS");
    }

    #[test]
    fn test_category_parse_any_case() {
        assert_eq!(Category::parse("narrative"), Some(Category::Narrative));
        assert_eq!(Category::parse("OPERATIONS"), Some(Category::Operations));
        assert_eq!(Category::parse(" Financials "), Some(Category::Financials));
        assert_eq!(Category::parse("failed"), None);
    }

    #[test]
    fn test_category_from_str() {
        let category: Category = "financials".parse().unwrap();
        assert_eq!(category, Category::Financials);
        assert!("finance".parse::<Category>().is_err());
    }

    #[test]
    fn test_dir_names_are_lowercase_labels() {
        for category in Category::ALL {
            assert_eq!(category.dir_name(), category.as_str().to_lowercase());
        }
    }
}
