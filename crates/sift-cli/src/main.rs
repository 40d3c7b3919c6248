//! Sift CLI - Chunk and classify report text from the command line.

use clap::Parser;
use sift_cli::commands;
use sift_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins unless `--verbose` is given
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> sift_cli::Result<()> {
    // Init must work even when the existing file is broken
    if let Command::Init(args) = cli.command {
        let formatter = Formatter::new(
            cli.format.map(Into::into).unwrap_or_default(),
            !cli.no_color,
        );
        return commands::execute_init(args, cli.config.as_deref(), &formatter);
    }

    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Chunk(args) => commands::execute_chunk(args, &config, &formatter),
        Command::Classify(args) => commands::execute_classify(args, &config, &formatter).await,
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await,
        Command::Categorize(args) => commands::execute_categorize(args, &formatter),
        Command::Check(args) => commands::execute_check(args, &config, &formatter).await,
        Command::Init(_) => Ok(()),
    }
}
