//! Error types for document analysis

use thiserror::Error;

/// Errors raised while extracting metadata from a single chunk
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model output could not be parsed, even after a repair attempt
    #[error("Invalid metadata format: {0}")]
    InvalidFormat(String),

    /// Extraction did not finish within the configured timeout
    #[error("Extraction timeout")]
    Timeout,
}

impl From<serde_json::Error> for ExtractionError {
    fn from(e: serde_json::Error) -> Self {
        ExtractionError::InvalidFormat(format!("JSON parse error: {}", e))
    }
}

/// Errors surfaced by the analysis pipeline
///
/// Merge outcomes such as duplicates or type mismatches are not errors; only
/// configuration and extraction failures are.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Invalid chunking or pipeline parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A chunk's extraction failed; no partial result is returned
    #[error("Extraction failed for chunk {chunk}: {source}")]
    Extraction {
        /// One-based chunk number
        chunk: usize,
        /// Root cause reported by the extractor
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The analysis deadline passed before all chunks were dispatched
    #[error("Extraction aborted before chunk {next_chunk}: {reason}")]
    ExtractionAborted {
        /// One-based number of the first chunk that was not dispatched
        next_chunk: usize,
        /// Why the run stopped
        reason: String,
    },

    /// Unexpected internal fault (e.g. a panicked worker task)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Wrap an extractor failure for the given one-based chunk number
    pub fn extraction<E>(chunk: usize, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AnalysisError::Extraction {
            chunk,
            source: Box::new(source),
        }
    }
}
