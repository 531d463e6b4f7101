//! Configuration for the document analyzer

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the document analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum chunk size (characters)
    pub max_chunk_size: usize,

    /// Characters shared between neighbouring chunks
    pub chunk_overlap: usize,

    /// Maximum time for a single chunk extraction (seconds)
    pub extraction_timeout_secs: u64,

    /// Chunks extracted at once; 1 keeps extraction strictly sequential
    pub max_concurrent_extractions: usize,

    /// Wall-clock budget for a whole analysis (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_deadline_secs: Option<u64>,

    /// Log a warning whenever the merge drops a value of a mismatched type
    pub warn_on_type_conflict: bool,
}

impl AnalyzerConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Get the analysis deadline as a Duration
    pub fn analysis_deadline(&self) -> Option<Duration> {
        self.analysis_deadline_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.max_chunk_size == 0 {
            return Err(AnalysisError::Configuration(
                "max_chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.max_chunk_size {
            return Err(AnalysisError::Configuration(format!(
                "chunk_overlap ({}) must be smaller than max_chunk_size ({})",
                self.chunk_overlap, self.max_chunk_size
            )));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(AnalysisError::Configuration(
                "extraction_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrent_extractions == 0 {
            return Err(AnalysisError::Configuration(
                "max_concurrent_extractions must be greater than 0".to_string(),
            ));
        }
        if self.analysis_deadline_secs == Some(0) {
            return Err(AnalysisError::Configuration(
                "analysis_deadline_secs must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    /// Default configuration: 1200-char chunks with 200 chars of overlap, extracted one at a time
    fn default() -> Self {
        Self {
            max_chunk_size: 1200,
            chunk_overlap: 200,
            extraction_timeout_secs: 120,
            max_concurrent_extractions: 1,
            analysis_deadline_secs: None,
            warn_on_type_conflict: true,
        }
    }
}

impl AnalyzerConfig {
    /// Aggressive preset: smaller chunks, shorter timeouts, parallel extraction
    pub fn aggressive() -> Self {
        Self {
            max_chunk_size: 800,
            chunk_overlap: 100,
            extraction_timeout_secs: 60,
            max_concurrent_extractions: 4,
            analysis_deadline_secs: Some(600),
            warn_on_type_conflict: true,
        }
    }

    /// Lenient preset: larger chunks and longer timeouts for better quality
    pub fn lenient() -> Self {
        Self {
            max_chunk_size: 4000,
            chunk_overlap: 400,
            extraction_timeout_secs: 300,
            max_concurrent_extractions: 1,
            analysis_deadline_secs: None,
            warn_on_type_conflict: true,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| AnalysisError::Configuration(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, AnalysisError> {
        toml::to_string_pretty(self).map_err(|e| {
            AnalysisError::Configuration(format!("Failed to serialize to TOML: {}", e))
        })
    }
}
