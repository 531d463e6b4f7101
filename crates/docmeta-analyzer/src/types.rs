//! Result types for document analysis

use crate::json::metadata_to_json;
use docmeta_domain::{MergedMetadata, TypeConflict};

/// Result of analyzing one document
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Metadata merged across every chunk
    pub metadata: MergedMetadata,

    /// Number of chunks the document was split into
    pub chunk_count: usize,

    /// Values the merge dropped because their type did not match
    pub conflicts: Vec<TypeConflict>,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl AnalysisReport {
    /// An empty report for an empty document
    pub fn empty() -> Self {
        Self {
            metadata: MergedMetadata::new(),
            chunk_count: 0,
            conflicts: Vec::new(),
            processing_time_ms: 0,
        }
    }

    /// The merged metadata as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        metadata_to_json(&self.metadata)
    }

    /// Sorted field names present in the merged metadata
    pub fn keys(&self) -> Vec<&str> {
        self.metadata.keys().map(String::as_str).collect()
    }
}
