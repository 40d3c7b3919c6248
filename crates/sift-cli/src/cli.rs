//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use sift_domain::Category;
use sift_pipeline::InferenceConfig;
use std::path::PathBuf;

/// Sift - Chunk report text and sort it into narrative, operations and financials.
#[derive(Debug, Parser)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.sift/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log per-chunk and per-attempt detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split documents into chunk files without classifying them
    Chunk(ChunkArgs),

    /// Classify every chunk into per-category directories
    Classify(ClassifyArgs),

    /// Collect the chunks of one category into a single file per document
    Extract(ExtractArgs),

    /// Sort text files by keyword rules only
    Categorize(CategorizeArgs),

    /// Check that the inference backend is running and has the model
    Check(BackendArgs),

    /// Write a default configuration file
    Init(InitArgs),
}

/// Inference backend overrides shared by several commands.
#[derive(Debug, Clone, Default, Args)]
pub struct BackendArgs {
    /// Model to classify with
    #[arg(short, long, env = "SIFT_MODEL")]
    pub model: Option<String>,

    /// Ollama API endpoint
    #[arg(long, env = "SIFT_OLLAMA_URL")]
    pub endpoint: Option<String>,

    /// Timeout per attempt in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts per chunk
    #[arg(long)]
    pub retries: Option<u32>,
}

impl BackendArgs {
    /// Apply the overrides that were given
    pub fn apply(&self, config: &mut InferenceConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = timeout.saturating_mul(1_000);
        }
        if let Some(retries) = self.retries {
            config.max_retries = retries;
        }
    }
}

/// Arguments for the chunk command.
#[derive(Debug, Parser)]
pub struct ChunkArgs {
    /// Directory of extracted .txt documents
    pub input: PathBuf,

    /// Directory the chunk files are written to
    #[arg(short, long)]
    pub output: PathBuf,

    /// Characters per chunk
    #[arg(long)]
    pub target_size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Directory of extracted .txt documents
    pub input: PathBuf,

    /// Root of the per-category output directories
    #[arg(short, long)]
    pub output: PathBuf,

    /// Minimum cleaned chunk length sent to a classifier
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Skip the backend check before the run
    #[arg(long)]
    pub skip_check: bool,

    #[command(flatten)]
    pub backend: BackendArgs,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Directory of extracted .txt documents
    pub input: PathBuf,

    /// Root of the output directories
    #[arg(short, long)]
    pub output: PathBuf,

    /// Category to collect
    #[arg(long, value_enum, default_value = "financials")]
    pub category: CategoryArg,

    /// Skip the backend check before the run
    #[arg(long)]
    pub skip_check: bool,

    #[command(flatten)]
    pub backend: BackendArgs,
}

/// Arguments for the categorize command.
#[derive(Debug, Parser)]
pub struct CategorizeArgs {
    /// Directory of .txt files (documents or exported chunks)
    pub input: PathBuf,

    /// File names listed per category
    #[arg(short, long, default_value = "10")]
    pub list: usize,
}

/// Arguments for the init command.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Category argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CategoryArg {
    /// Letters, overviews, qualitative discussion
    Narrative,
    /// Business operations and form boilerplate
    Operations,
    /// Statements and financial data
    Financials,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<CategoryArg> for Category {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::Narrative => Category::Narrative,
            CategoryArg::Operations => Category::Operations,
            CategoryArg::Financials => Category::Financials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_command() {
        let cli = Cli::parse_from(["sift", "chunk", "data/text", "-o", "data/chunks"]);
        match cli.command {
            Command::Chunk(args) => {
                assert_eq!(args.input, PathBuf::from("data/text"));
                assert_eq!(args.output, PathBuf::from("data/chunks"));
                assert!(args.target_size.is_none());
            }
            _ => panic!("Expected Chunk command"),
        }
    }

    #[test]
    fn test_extract_defaults_to_financials() {
        let cli = Cli::parse_from(["sift", "extract", "in", "--output", "out"]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(Category::from(args.category), Category::Financials);
                assert!(!args.skip_check);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sift", "categorize", "in", "--format", "json", "-v"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.verbose);
    }

    #[test]
    fn test_backend_overrides() {
        let cli = Cli::parse_from([
            "sift", "classify", "in", "-o", "out", "--model", "llama3.2", "--timeout", "60",
        ]);
        let Command::Classify(args) = cli.command else {
            panic!("Expected Classify command");
        };

        let mut config = InferenceConfig::default();
        args.backend.apply(&mut config);
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.timeout(), std::time::Duration::from_secs(60));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_category_conversion() {
        let category: Category = CategoryArg::Narrative.into();
        assert_eq!(category, Category::Narrative);
    }
}
