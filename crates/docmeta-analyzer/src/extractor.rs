//! LLM-backed metadata extraction for a single chunk

use crate::error::ExtractionError;
use crate::parser::parse_metadata_response;
use crate::prompt::{build_repair_prompt, PromptBuilder};
use docmeta_domain::traits::{LlmProvider, MetadataExtractor};
use docmeta_domain::PartialMetadata;
use tracing::{debug, warn};

/// Default number of repair prompts sent after a malformed response
pub const DEFAULT_REPAIR_ATTEMPTS: usize = 1;

/// Extracts metadata from one chunk by prompting an LLM
///
/// When the model's output cannot be parsed, the extractor asks the model to
/// repair it, up to `repair_attempts` times. Provider failures are returned
/// immediately and never retried here.
pub struct LlmExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    repair_attempts: usize,
}

impl<L> LlmExtractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new extractor around an LLM provider
    pub fn new(llm_provider: L) -> Self {
        Self {
            llm_provider,
            repair_attempts: DEFAULT_REPAIR_ATTEMPTS,
        }
    }

    /// Set how many repair prompts may follow a malformed response
    pub fn with_repair_attempts(mut self, repair_attempts: usize) -> Self {
        self.repair_attempts = repair_attempts;
        self
    }

    /// Borrow the underlying provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    fn call_llm(&self, prompt: &str) -> Result<String, ExtractionError> {
        debug!("Prompt length: {} chars", prompt.len());
        let response = self
            .llm_provider
            .generate(prompt)
            .map_err(|e| ExtractionError::Llm(e.to_string()))?;
        debug!("LLM response length: {} chars", response.len());
        Ok(response)
    }
}

impl<L> MetadataExtractor for LlmExtractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    type Error = ExtractionError;

    fn extract(&self, chunk: &str, format_hint: &str) -> Result<PartialMetadata, Self::Error> {
        let prompt = PromptBuilder::new(chunk, format_hint).build();
        let mut response = self.call_llm(&prompt)?;

        let mut attempt = 0;
        loop {
            let error = match parse_metadata_response(&response) {
                Ok(metadata) => return Ok(metadata),
                Err(e) => e,
            };

            if attempt >= self.repair_attempts {
                return Err(error);
            }
            attempt += 1;

            warn!("Malformed model output, repair attempt {}: {}", attempt, error);
            let repair = build_repair_prompt(format_hint, &response, &error.to_string());
            response = self.call_llm(&repair)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmeta_domain::Value;
    use docmeta_llm::MockProvider;

    #[test]
    fn test_extract_valid_response() {
        let extractor = LlmExtractor::new(MockProvider::new(r#"{"Title": "Report"}"#));

        let metadata = extractor.extract("Some text", "{}").unwrap();
        assert_eq!(metadata["Title"], Value::from("Report"));
        assert_eq!(extractor.provider().call_count(), 1);
    }

    #[test]
    fn test_prompt_carries_chunk_and_hint() {
        let extractor = LlmExtractor::new(MockProvider::new("{}"));

        extractor.extract("chunk body", "HINT-MARKER").unwrap();
        let prompts = extractor.provider().prompts();
        assert!(prompts[0].contains("chunk body"));
        assert!(prompts[0].contains("HINT-MARKER"));
    }

    #[test]
    fn test_malformed_output_is_repaired_once() {
        let provider = MockProvider::with_sequence(["Title: Report", r#"{"Title": "Report"}"#]);
        let extractor = LlmExtractor::new(provider);

        let metadata = extractor.extract("Some text", "{}").unwrap();
        assert_eq!(metadata["Title"], Value::from("Report"));

        let prompts = extractor.provider().prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("Title: Report"));
    }

    #[test]
    fn test_irreparable_output_fails() {
        let provider = MockProvider::with_sequence(["not json", "still not json"]);
        let extractor = LlmExtractor::new(provider);

        let result = extractor.extract("Some text", "{}");
        assert!(matches!(result, Err(ExtractionError::InvalidFormat(_))));
        assert_eq!(extractor.provider().call_count(), 2);
    }

    #[test]
    fn test_repair_can_be_disabled() {
        let provider = MockProvider::with_sequence(["not json", r#"{"Title": "late"}"#]);
        let extractor = LlmExtractor::new(provider).with_repair_attempts(0);

        assert!(extractor.extract("Some text", "{}").is_err());
        assert_eq!(extractor.provider().call_count(), 1);
    }

    #[test]
    fn test_provider_error_is_not_retried() {
        let provider = MockProvider::with_sequence(Vec::<String>::new());
        provider.push_error();
        let extractor = LlmExtractor::new(provider);

        let result = extractor.extract("Some text", "{}");
        assert!(matches!(result, Err(ExtractionError::Llm(_))));
        assert_eq!(extractor.provider().call_count(), 1);
    }
}
