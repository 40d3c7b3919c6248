//! Document routing: chunk, classify, persist

use crate::chunking::TextChunker;
use crate::clean::clean_text;
use crate::config::SiftConfig;
use crate::error::SiftError;
use crate::inference::InferenceClassifier;
use crate::prompt::truncate_chars;
use crate::rules::RuleClassifier;
use crate::stats::{DocumentReport, RunStatistics};
use sift_domain::{
    Category, CategoryStore, Chunk, Classification, Document, DocumentSource, InferenceBackend,
};
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What the router persists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
    /// Every classified chunk goes into its category's bucket
    PerChunk,
    /// Only chunks of one category, joined into one artifact per document
    Aggregate(Category),
}

/// Drives documents through chunking, classification and persistence
///
/// Documents are handled one at a time and chunks strictly in index order.
pub struct Router<B, S> {
    chunker: TextChunker,
    rules: RuleClassifier,
    inference: InferenceClassifier<B>,
    store: S,
    mode: RoutingMode,
    min_chunk_length: usize,
    stats: RunStatistics,
    reports: Vec<DocumentReport>,
}

impl<B, S> Router<B, S>
where
    B: InferenceBackend + Send + Sync + 'static,
    S: CategoryStore,
    S::Error: Display,
{
    /// Create a router; configuration errors are reported here
    pub fn new(
        config: &SiftConfig,
        backend: B,
        store: S,
        mode: RoutingMode,
    ) -> Result<Self, SiftError> {
        config.validate().map_err(SiftError::Config)?;

        Ok(Self {
            chunker: TextChunker::new(config.chunking.clone())?,
            rules: RuleClassifier::new(),
            inference: InferenceClassifier::new(backend, config.inference.clone())?,
            store,
            mode,
            min_chunk_length: config.routing.min_chunk_length,
            stats: RunStatistics::new(),
            reports: Vec::new(),
        })
    }

    /// Routing mode
    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    /// The inference stage, e.g. for probing the backend before a run
    pub fn inference(&self) -> &InferenceClassifier<B> {
        &self.inference
    }

    /// Reports of documents routed so far
    pub fn reports(&self) -> &[DocumentReport] {
        &self.reports
    }

    /// The output store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the router, returning the store and everything recorded
    pub fn into_parts(self) -> (S, RunStatistics, Vec<DocumentReport>) {
        (self.store, self.stats, self.reports)
    }

    /// Classify one chunk: rules first, then inference
    ///
    /// Chunks whose cleaned text is shorter than the minimum length fail
    /// without reaching either classifier. Both classifiers see the same
    /// sample: the cleaned text cut to `max_sample_length` characters.
    pub async fn classify_chunk(&self, chunk: &Chunk) -> Classification {
        let cleaned = clean_text(&chunk.text);
        let cleaned_len = cleaned.chars().count();

        if cleaned_len < self.min_chunk_length {
            debug!(
                chunk = chunk.index,
                cleaned_len,
                min = self.min_chunk_length,
                "Chunk too short to classify"
            );
            return Classification::failed(chunk.index);
        }

        let sample = truncate_chars(&cleaned, self.inference.config().max_sample_length);

        if let Some(category) = self.rules.classify(sample) {
            return Classification::by_rule(chunk.index, category);
        }

        match self.inference.classify(sample).await {
            Ok(category) => Classification::by_inference(chunk.index, category),
            Err(e) => {
                debug!(chunk = chunk.index, error = %e, "Chunk left unclassified");
                Classification::failed(chunk.index)
            }
        }
    }

    /// Chunk, classify and persist one document
    ///
    /// Statistics are updated per chunk as it is classified. A write error
    /// abandons the rest of the document.
    pub async fn route_document(&mut self, document: &Document) -> Result<DocumentReport, SiftError> {
        let chunks = self.chunker.chunk(&document.text)?;
        let mut report = DocumentReport::new(&document.id);
        report.total_chunks = chunks.len();

        debug!(document = %document.id, chunks = chunks.len(), "Document chunked");

        let mut collected: Vec<&str> = Vec::new();

        for chunk in &chunks {
            let classification = self.classify_chunk(chunk).await;
            self.stats.record(&classification);
            report.record(&classification);

            debug!(
                document = %document.id,
                chunk = chunk.index,
                category = ?classification.category,
                source = classification.source.as_str(),
                "Chunk classified"
            );

            let Some(category) = classification.category else {
                continue;
            };

            match self.mode {
                RoutingMode::PerChunk => self
                    .store
                    .write(category, &document.id, chunk.index, &chunk.text)
                    .map_err(|e| SiftError::Write(e.to_string()))?,
                RoutingMode::Aggregate(target) if category == target => collected.push(&chunk.text),
                RoutingMode::Aggregate(_) => {}
            }
        }

        if let RoutingMode::Aggregate(target) = self.mode {
            report.target_chunks = Some(collected.len());

            if collected.is_empty() {
                info!(document = %document.id, "No {} chunks found, nothing written", target);
            } else {
                self.store
                    .write_aggregate(target, &document.id, &collected.join("\n\n"))
                    .map_err(|e| SiftError::Write(e.to_string()))?;
                report.aggregate_written = true;
            }
        }

        Ok(report)
    }

    /// Route every document of `source` in sorted id order
    ///
    /// Read and write failures are counted per document and the run goes on.
    /// Failing to list the source, or an invalid configuration, ends the run.
    pub async fn run<D>(&mut self, source: &D) -> Result<RunStatistics, SiftError>
    where
        D: DocumentSource,
        D::Error: Display,
    {
        let started = Instant::now();

        let mut ids = source
            .document_ids()
            .map_err(|e| SiftError::Read(e.to_string()))?;
        ids.sort();

        info!(documents = ids.len(), mode = ?self.mode, "Starting run");

        for id in ids {
            let text = match source.read(&id) {
                Ok(text) => text,
                Err(e) => {
                    warn!(document = %id, error = %e, "Failed to read document, skipping");
                    self.stats.record_document_failed();
                    continue;
                }
            };

            let document = Document::new(id, text);
            if document.is_blank() {
                info!(document = %document.id, "Document is empty, skipping");
                self.stats.record_document_skipped();
                continue;
            }

            info!(document = %document.id, chars = document.char_len(), "Processing document");

            match self.route_document(&document).await {
                Ok(report) => {
                    info!(
                        document = %report.document_id,
                        chunks = report.total_chunks,
                        classified = report.classified,
                        failed = report.failed,
                        "Document routed"
                    );
                    self.stats.record_document_processed();
                    self.reports.push(report);
                }
                Err(SiftError::Write(detail)) => {
                    warn!(document = %document.id, error = %detail, "Failed to write output, skipping document");
                    self.stats.record_document_failed();
                }
                Err(e) => return Err(e),
            }
        }

        self.stats.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            processed = self.stats.documents_processed,
            failed = self.stats.documents_failed,
            chunks = self.stats.chunks_total,
            "Run complete"
        );

        Ok(self.stats.clone())
    }
}
