//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::PartialMetadata;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (docmeta-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for extracting metadata from one chunk of a document
///
/// Implemented by the application layer (docmeta-analyzer). Implementations
/// may be slow and may fail; callers must not hold locks across a call.
pub trait MetadataExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract a partial metadata record from one chunk
    ///
    /// `format_hint` describes the expected output fields and shapes.
    fn extract(&self, chunk: &str, format_hint: &str) -> Result<PartialMetadata, Self::Error>;
}
