//! Docmeta Analyzer
//!
//! Extracts structured metadata from arbitrarily long documents using an LLM.
//!
//! # Overview
//!
//! A document is split into bounded, overlapping chunks. Each chunk is handed
//! to a [`MetadataExtractor`](docmeta_domain::traits::MetadataExtractor), and the
//! per-chunk partial records are folded, in chunk order, into one merged record.
//!
//! # Architecture
//!
//! ```text
//! Text → TextChunker → [chunk₁ … chunkₙ] → Extractor → [record₁ … recordₙ] → MetadataMerger → metadata
//! ```
//!
//! # Key Features
//!
//! - **UTF-8 Safe Chunking**: Char-counted windows with overlap and boundary snapping
//! - **LLM Integration**: Prompting with format instructions and one output repair attempt
//! - **Deterministic Merge**: Ordered fold, even when chunks are extracted concurrently
//! - **Fail Fast**: Any chunk failure fails the whole analysis
//!
//! # Example Usage
//!
//! ```no_run
//! use docmeta_analyzer::{AnalyzerConfig, DocumentAnalyzer, LlmExtractor};
//! use docmeta_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"Title": "Quarterly Report", "PageCount": 12}"#);
//! let extractor = LlmExtractor::new(llm);
//! let analyzer = DocumentAnalyzer::new(extractor, AnalyzerConfig::default())?;
//!
//! let report = analyzer.analyze("Quarterly Report. Revenue grew 12%.").await?;
//!
//! println!("Chunks: {}", report.chunk_count);
//! println!("{}", report.to_json());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod chunking;
mod config;
mod error;
mod extractor;
mod json;
mod parser;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use analyzer::DocumentAnalyzer;
pub use chunking::{TextChunk, TextChunker};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, ExtractionError};
pub use extractor::{LlmExtractor, DEFAULT_REPAIR_ATTEMPTS};
pub use json::{metadata_from_json, metadata_to_json, value_from_json, value_to_json};
pub use parser::parse_metadata_response;
pub use prompt::{build_repair_prompt, FieldShape, MetadataField, MetadataSchema, PromptBuilder};
pub use types::AnalysisReport;
