//! Classify and extract command implementations.

use crate::cli::{ClassifyArgs, ExtractArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use sift_llm::OllamaBackend;
use sift_pipeline::{Router, RoutingMode, SiftConfig};
use sift_store::{DirectorySource, DirectoryStore};
use std::path::Path;
use tracing::info;

/// Execute the classify command.
pub async fn execute_classify(
    args: ClassifyArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let mut pipeline = config.classify.clone();
    args.backend.apply(&mut pipeline.inference);
    if let Some(min_length) = args.min_length {
        pipeline.routing.min_chunk_length = min_length;
    }

    run_pipeline(
        &pipeline,
        &args.input,
        &args.output,
        RoutingMode::PerChunk,
        args.skip_check,
        formatter,
    )
    .await
}

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let mut pipeline = config.extract.clone();
    args.backend.apply(&mut pipeline.inference);

    run_pipeline(
        &pipeline,
        &args.input,
        &args.output,
        RoutingMode::Aggregate(args.category.into()),
        args.skip_check,
        formatter,
    )
    .await
}

async fn run_pipeline(
    pipeline: &SiftConfig,
    input: &Path,
    output: &Path,
    mode: RoutingMode,
    skip_check: bool,
    formatter: &Formatter,
) -> Result<()> {
    let backend = OllamaBackend::new(&pipeline.inference.endpoint, &pipeline.inference.model);
    let store = DirectoryStore::new(output);
    let mut router = Router::new(pipeline, backend, store, mode)?;

    if !skip_check {
        router.inference().probe().await?;
    }

    info!(
        mode = ?router.mode(),
        "Routing {} into {} with model {}",
        input.display(),
        output.display(),
        pipeline.inference.model
    );

    router.run(&DirectorySource::new(input)).await?;
    let (_, stats, reports) = router.into_parts();
    println!("{}", formatter.format_run(&stats, &reports)?);

    Ok(())
}
