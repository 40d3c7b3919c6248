//! Chunk command implementation.

use crate::cli::ChunkArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use serde::Serialize;
use sift_domain::DocumentSource;
use sift_pipeline::TextChunker;
use sift_store::{DirectorySource, DirectoryStore};
use tracing::{info, warn};

/// Chunk files written for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedDocument {
    /// Source identifier
    pub document_id: String,
    /// Number of chunk files written
    pub chunks: usize,
}

/// Outcome of a chunk export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Documents exported, in id order
    pub documents: Vec<ExportedDocument>,
    /// Documents that could not be read or written
    pub failed: Vec<String>,
    /// Blank documents
    pub skipped: Vec<String>,
}

impl ExportReport {
    /// Chunk files written across all documents
    pub fn total_chunks(&self) -> usize {
        self.documents.iter().map(|d| d.chunks).sum()
    }
}

/// Execute the chunk command.
pub fn execute_chunk(args: ChunkArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut chunking = config.export.clone();
    if let Some(target_size) = args.target_size {
        chunking.target_size = target_size;
    }
    if let Some(overlap) = args.overlap {
        chunking.overlap = overlap;
    }
    let chunker = TextChunker::new(chunking)?;

    info!(
        "Chunking {} into {} ({} chars, {} overlap)",
        args.input.display(),
        args.output.display(),
        chunker.config().target_size,
        chunker.config().overlap
    );

    let source = DirectorySource::new(&args.input);
    let store = DirectoryStore::new(&args.output);
    let report = export_chunks(&source, &store, &chunker)?;

    match formatter.format() {
        OutputFormat::Json => println!("{}", formatter.json(&report)?),
        OutputFormat::Table => {
            let rows = report
                .documents
                .iter()
                .map(|d| vec![d.document_id.clone(), d.chunks.to_string()]);
            println!("{}", formatter.table(&["Document", "Chunks"], rows));
            for id in &report.failed {
                println!("{}", formatter.error(&format!("Failed: {}", id)));
            }
            for id in &report.skipped {
                println!("{}", formatter.warning(&format!("Empty, skipped: {}", id)));
            }
            println!(
                "{}",
                formatter.success(&format!(
                    "Wrote {} chunk(s) from {} document(s) to {}",
                    report.total_chunks(),
                    report.documents.len(),
                    args.output.display()
                ))
            );
        }
    }

    Ok(())
}

/// Chunk every document of `source` into `<id>_chunk_NNNN.txt` files.
///
/// A document that cannot be read or written is recorded as failed and the
/// export continues.
pub fn export_chunks(
    source: &DirectorySource,
    store: &DirectoryStore,
    chunker: &TextChunker,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();

    for id in source.document_ids()? {
        let text = match source.read(&id) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {}: {}", id, e);
                report.failed.push(id);
                continue;
            }
        };

        if text.trim().is_empty() {
            warn!("Skipping {}: document is empty", id);
            report.skipped.push(id);
            continue;
        }

        let chunks = chunker.chunk(&text)?;
        let written = chunks
            .iter()
            .try_for_each(|chunk| store.write_chunk_file(&id, chunk.index, &chunk.text).map(|_| ()));

        match written {
            Ok(()) => {
                info!("{}: {} chunk(s)", id, chunks.len());
                report.documents.push(ExportedDocument {
                    document_id: id,
                    chunks: chunks.len(),
                });
            }
            Err(e) => {
                warn!("Failed to write chunks of {}: {}", id, e);
                report.failed.push(id);
            }
        }
    }

    Ok(report)
}
