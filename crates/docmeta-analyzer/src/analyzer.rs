//! Chunk, extract, merge: the document analysis pipeline

use crate::chunking::{TextChunk, TextChunker};
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, ExtractionError};
use crate::prompt::MetadataSchema;
use crate::types::AnalysisReport;
use docmeta_domain::traits::MetadataExtractor;
use docmeta_domain::{MergedMetadata, MetadataMerger, PartialMetadata};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::timeout;
use tracing::{debug, info, warn};

type ChunkOutcome = (usize, Result<PartialMetadata, AnalysisError>);

/// Analyzes documents by chunking, per-chunk extraction and an ordered merge
///
/// The extractor (and through it the model client) is injected; the analyzer
/// holds no state across calls, and the merge accumulator lives only for the
/// duration of one [`DocumentAnalyzer::analyze`] call.
pub struct DocumentAnalyzer<E>
where
    E: MetadataExtractor,
{
    extractor: Arc<E>,
    chunker: TextChunker,
    config: AnalyzerConfig,
    format_hint: Arc<str>,
}

impl<E> DocumentAnalyzer<E>
where
    E: MetadataExtractor + Send + Sync + 'static,
    E::Error: std::error::Error + Send + Sync + 'static,
{
    /// Create a new analyzer
    ///
    /// Fails with [`AnalysisError::Configuration`] before any extraction can
    /// happen if the configuration is invalid.
    pub fn new(extractor: E, config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let chunker = TextChunker::from_config(&config)?;

        info!(
            "DocumentAnalyzer initialized: chunk size {}, overlap {}, concurrency {}",
            config.max_chunk_size, config.chunk_overlap, config.max_concurrent_extractions
        );

        Ok(Self {
            extractor: Arc::new(extractor),
            chunker,
            config,
            format_hint: MetadataSchema::default().format_instructions().into(),
        })
    }

    /// Replace the format instructions passed to the extractor
    pub fn with_format_hint(mut self, format_hint: impl Into<String>) -> Self {
        let format_hint: String = format_hint.into();
        self.format_hint = Arc::from(format_hint);
        self
    }

    /// Replace the format instructions with those of a schema
    pub fn with_schema(self, schema: &MetadataSchema) -> Self {
        self.with_format_hint(schema.format_instructions())
    }

    /// The active configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The chunker used to split documents
    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Analyze a document and return only the merged metadata
    pub async fn analyze_document(&self, text: &str) -> Result<MergedMetadata, AnalysisError> {
        self.analyze(text).await.map(|report| report.metadata)
    }

    /// Analyze a document
    ///
    /// Any chunk failure fails the whole call; no partial metadata is returned.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();

        let chunks = self.chunker.chunk_spans(text);
        info!("Document chunked into {} chunks", chunks.len());

        if chunks.is_empty() {
            return Ok(AnalysisReport::empty());
        }

        let records = match self.config.max_concurrent_extractions {
            1 => self.extract_sequential(&chunks, started).await,
            limit => self.extract_concurrent(&chunks, limit, started).await,
        }
        .inspect_err(|e| warn!("Metadata analysis failed: {}", e))?;

        let mut merger = MetadataMerger::new();
        for record in records {
            merger.absorb(record);
        }
        let (metadata, conflicts) = merger.into_parts();

        if self.config.warn_on_type_conflict {
            for conflict in &conflicts {
                warn!(
                    "Dropped {} value for '{}' from chunk {}: field already holds a {}",
                    conflict.incoming_kind,
                    conflict.key,
                    conflict.record_index + 1,
                    conflict.existing_kind
                );
            }
        }

        let keys: Vec<&str> = metadata.keys().map(String::as_str).collect();
        info!("Metadata extraction successful, keys: {:?}", keys);

        Ok(AnalysisReport {
            metadata,
            chunk_count: chunks.len(),
            conflicts,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Extract chunks one after another, in order
    async fn extract_sequential(
        &self,
        chunks: &[TextChunk],
        started: Instant,
    ) -> Result<Vec<PartialMetadata>, AnalysisError> {
        let mut records = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            self.check_deadline(started, chunk.index + 1)?;
            info!("Analyzing chunk {}/{}", chunk.index + 1, chunks.len());

            let record = Self::extract_chunk(
                Arc::clone(&self.extractor),
                chunk.index,
                chunk.text.clone(),
                Arc::clone(&self.format_hint),
                self.config.extraction_timeout(),
            )
            .await?;
            records.push(record);
        }

        Ok(records)
    }

    /// Extract up to `limit` chunks at once, then restore chunk order
    ///
    /// Results land in a slot per chunk index so the merge sees them in the
    /// same order as a sequential run.
    async fn extract_concurrent(
        &self,
        chunks: &[TextChunk],
        limit: usize,
        started: Instant,
    ) -> Result<Vec<PartialMetadata>, AnalysisError> {
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks: JoinSet<ChunkOutcome> = JoinSet::new();
        let mut slots: Vec<Option<PartialMetadata>> = vec![None; chunks.len()];

        // Dropping `tasks` on an early return aborts everything still queued
        for chunk in chunks {
            while let Some(joined) = tasks.try_join_next() {
                store_outcome(&mut slots, joined)?;
            }

            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| AnalysisError::Internal(format!("Semaphore closed: {}", e)))?;

            self.check_deadline(started, chunk.index + 1)?;
            info!("Dispatching chunk {}/{}", chunk.index + 1, chunks.len());

            let extractor = Arc::clone(&self.extractor);
            let format_hint = Arc::clone(&self.format_hint);
            let text = chunk.text.clone();
            let index = chunk.index;
            let extraction_timeout = self.config.extraction_timeout();

            tasks.spawn(async move {
                let _permit = permit;
                let outcome =
                    Self::extract_chunk(extractor, index, text, format_hint, extraction_timeout)
                        .await;
                (index, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            store_outcome(&mut slots, joined)?;
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| {
                    AnalysisError::Internal(format!("No result recorded for chunk {}", i + 1))
                })
            })
            .collect()
    }

    /// Run the extractor for one chunk on the blocking pool under a timeout
    ///
    /// A timed-out extraction cannot be interrupted; its thread runs to
    /// completion and the result is discarded.
    async fn extract_chunk(
        extractor: Arc<E>,
        index: usize,
        text: String,
        format_hint: Arc<str>,
        extraction_timeout: Duration,
    ) -> Result<PartialMetadata, AnalysisError> {
        let number = index + 1;
        let task = tokio::task::spawn_blocking(move || extractor.extract(&text, &format_hint));

        let record = match timeout(extraction_timeout, task).await {
            Err(_) => return Err(AnalysisError::extraction(number, ExtractionError::Timeout)),
            Ok(Err(join_error)) => {
                return Err(AnalysisError::Internal(format!(
                    "Extraction task for chunk {} failed: {}",
                    number, join_error
                )))
            }
            Ok(Ok(Err(e))) => return Err(AnalysisError::extraction(number, e)),
            Ok(Ok(Ok(record))) => record,
        };

        debug!("Chunk {} yielded {} fields", number, record.len());
        Ok(record)
    }

    fn check_deadline(&self, started: Instant, next_chunk: usize) -> Result<(), AnalysisError> {
        match self.config.analysis_deadline() {
            Some(deadline) if started.elapsed() >= deadline => {
                Err(AnalysisError::ExtractionAborted {
                    next_chunk,
                    reason: format!("analysis deadline of {:?} exceeded", deadline),
                })
            }
            _ => Ok(()),
        }
    }
}

fn store_outcome(
    slots: &mut [Option<PartialMetadata>],
    joined: Result<ChunkOutcome, JoinError>,
) -> Result<(), AnalysisError> {
    let (index, outcome) =
        joined.map_err(|e| AnalysisError::Internal(format!("Extraction task failed: {}", e)))?;
    slots[index] = Some(outcome?);
    Ok(())
}
