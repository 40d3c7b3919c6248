//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde::Serialize;
use sift_domain::Category;
use sift_pipeline::{DocumentReport, RunStatistics};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Serialize any report as pretty JSON.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Render rows under a header as a rounded table.
    pub fn table<I>(&self, header: &[&str], rows: I) -> String
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut builder = Builder::default();
        builder.push_record(header.iter().map(|h| h.to_string()));
        for row in rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format the outcome of a classification or extraction run.
    pub fn format_run(&self, stats: &RunStatistics, reports: &[DocumentReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json(&serde_json::json!({
                "statistics": stats,
                "documents": reports,
            })),
            OutputFormat::Table => Ok(self.format_run_table(stats, reports)),
        }
    }

    fn format_run_table(&self, stats: &RunStatistics, reports: &[DocumentReport]) -> String {
        let mut sections = Vec::new();

        if reports.is_empty() {
            sections.push(self.warning("No documents were processed."));
        } else {
            let mut header = vec!["Document", "Chunks"];
            header.extend(Category::ALL.iter().map(|c| c.as_str()));
            header.extend(["Failed", "Rule", "Inference"]);

            let rows = reports.iter().map(|report| {
                let mut row = vec![report.document_id.clone(), report.total_chunks.to_string()];
                row.extend(report.distribution.iter().map(|(_, n)| n.to_string()));
                row.push(report.failed.to_string());
                row.push(report.rule_decisions.to_string());
                row.push(report.inference_decisions.to_string());
                row
            });
            sections.push(self.table(&header, rows));
        }

        sections.push(stats.summary());

        let outcome = format!(
            "{} of {} chunks classified",
            stats.total_classified(),
            stats.chunks_total
        );
        if stats.failures == 0 && stats.documents_failed == 0 {
            sections.push(self.success(&outcome));
        } else {
            sections.push(self.warning(&format!(
                "{}, {} unclassified, {} document(s) failed",
                outcome, stats.failures, stats.documents_failed
            )));
        }

        sections.join("\n\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
