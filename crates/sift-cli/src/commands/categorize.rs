//! Categorize command implementation.

use crate::cli::CategorizeArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use serde::Serialize;
use sift_domain::{Category, DocumentSource};
use sift_pipeline::{CategoryCounts, RuleClassifier};
use sift_store::{DirectorySource, TEXT_EXTENSION};
use tracing::warn;

/// Category applied when no rule matches
const FALLBACK: Category = Category::Operations;

/// Files assigned to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFiles {
    /// Upper-case category label
    pub category: String,
    /// File names, in sorted order
    pub files: Vec<String>,
}

/// Outcome of a rule-only categorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Categorization {
    /// Files categorized
    pub total: usize,
    /// Files per category
    pub counts: CategoryCounts,
    /// File names per category
    pub breakdown: Vec<CategoryFiles>,
    /// Files that could not be read
    pub unreadable: Vec<String>,
}

/// Execute the categorize command.
pub fn execute_categorize(args: CategorizeArgs, formatter: &Formatter) -> Result<()> {
    let source = DirectorySource::new(&args.input);
    let result = categorize(&source, &RuleClassifier::new())?;

    match formatter.format() {
        OutputFormat::Json => println!("{}", formatter.json(&result)?),
        OutputFormat::Table => {
            let mut rows: Vec<Vec<String>> = result
                .counts
                .iter()
                .map(|(category, count)| vec![category.to_string(), count.to_string()])
                .collect();
            rows.push(vec!["TOTAL".to_string(), result.total.to_string()]);
            println!("{}", formatter.table(&["Category", "Files"], rows));

            for group in &result.breakdown {
                println!("\n{} ({} files):", group.category, group.files.len());
                for name in group.files.iter().take(args.list) {
                    println!("  - {}", name);
                }
                if group.files.len() > args.list {
                    println!("  ... and {} more", group.files.len() - args.list);
                }
            }

            for name in &result.unreadable {
                println!("{}", formatter.error(&format!("Unreadable: {}", name)));
            }
        }
    }

    Ok(())
}

/// Assign every file of `source` a category using the rule table alone.
pub fn categorize(source: &DirectorySource, rules: &RuleClassifier) -> Result<Categorization> {
    let mut counts = CategoryCounts::default();
    let mut breakdown: Vec<CategoryFiles> = Category::ALL
        .iter()
        .map(|c| CategoryFiles {
            category: c.to_string(),
            files: Vec::new(),
        })
        .collect();
    let mut unreadable = Vec::new();

    for id in source.document_ids()? {
        let file_name = format!("{}.{}", id, TEXT_EXTENSION);
        let text = match source.read(&id) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {}: {}", file_name, e);
                unreadable.push(file_name);
                continue;
            }
        };

        let category = rules.classify_or(&text, FALLBACK);
        counts.increment(category);
        if let Some(position) = Category::ALL.iter().position(|c| *c == category) {
            breakdown[position].files.push(file_name);
        }
    }

    Ok(Categorization {
        total: counts.total(),
        counts,
        breakdown,
        unreadable,
    })
}
