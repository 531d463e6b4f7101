//! Integration tests for the analysis pipeline

#[cfg(test)]
mod tests {
    use crate::{
        AnalysisError, AnalyzerConfig, DocumentAnalyzer, ExtractionError, LlmExtractor,
    };
    use docmeta_domain::traits::MetadataExtractor;
    use docmeta_domain::{PartialMetadata, Value};
    use docmeta_llm::MockProvider;
    use serde_json::json;
    use std::error::Error as _;
    use std::thread;
    use std::time::Duration;

    fn small_chunks(concurrency: usize) -> AnalyzerConfig {
        AnalyzerConfig {
            max_chunk_size: 10,
            chunk_overlap: 0,
            max_concurrent_extractions: concurrency,
            ..AnalyzerConfig::default()
        }
    }

    /// Reports the chunk's first char as its title after a delay that shrinks
    /// with each later letter, so later chunks finish first
    struct SlowLetterExtractor;

    impl MetadataExtractor for SlowLetterExtractor {
        type Error = ExtractionError;

        fn extract(&self, chunk: &str, _hint: &str) -> Result<PartialMetadata, Self::Error> {
            let first = chunk.chars().next().unwrap_or('?');
            let delay = 30 * (b'e' - first as u8) as u64;
            thread::sleep(Duration::from_millis(delay));

            let mut record = PartialMetadata::new();
            record.insert("title".to_string(), Value::String(first.to_string()));
            Ok(record)
        }
    }

    struct SleepyExtractor(Duration);

    impl MetadataExtractor for SleepyExtractor {
        type Error = ExtractionError;

        fn extract(&self, _chunk: &str, _hint: &str) -> Result<PartialMetadata, Self::Error> {
            thread::sleep(self.0);
            Ok(PartialMetadata::new())
        }
    }

    #[tokio::test]
    async fn test_end_to_end_three_chunks() {
        let llm = MockProvider::with_sequence([
            r#"{"title": "Report", "count": 1}"#,
            r#"{"title": "Report", "count": 3}"#,
            r#"{"title": "Summary", "count": 2}"#,
        ]);
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm), AnalyzerConfig::default()).unwrap();

        let document = "word ".repeat(600);
        assert_eq!(document.chars().count(), 3000);

        let report = analyzer.analyze(&document).await.unwrap();

        assert_eq!(report.chunk_count, 3);
        assert_eq!(report.to_json(), json!({"title": "Report | Summary", "count": 3}));
        assert!(report.conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_short_document_is_a_single_call() {
        let llm = MockProvider::new(r#"{"Title": "Memo", "Publisher": null}"#);
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm.clone()), AnalyzerConfig::default())
                .unwrap();

        let metadata = analyzer.analyze_document("A short memo.").await.unwrap();

        assert_eq!(llm.call_count(), 1);
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["Title"], Value::from("Memo"));
    }

    #[tokio::test]
    async fn test_empty_document_makes_no_calls() {
        let llm = MockProvider::new("{}");
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm.clone()), AnalyzerConfig::default())
                .unwrap();

        let metadata = analyzer.analyze_document("").await.unwrap();

        assert!(metadata.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompts_follow_chunk_order() {
        let llm = MockProvider::new("{}");
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm.clone()), small_chunks(1)).unwrap();

        analyzer
            .analyze("aaaaaaaaaabbbbbbbbbbcccccccccc")
            .await
            .unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("aaaaaaaaaa"));
        assert!(prompts[1].contains("bbbbbbbbbb"));
        assert!(prompts[2].contains("cccccccccc"));
    }

    #[tokio::test]
    async fn test_extraction_failure_aborts_analysis() {
        let llm = MockProvider::with_sequence([r#"{"title": "ok"}"#]);
        llm.push_error();
        llm.push_response(r#"{"title": "never reached"}"#);
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm.clone()), small_chunks(1)).unwrap();

        let result = analyzer.analyze(&"x".repeat(30)).await;

        match result {
            Err(AnalysisError::Extraction { chunk, source }) => {
                assert_eq!(chunk, 2);
                let cause = source.downcast_ref::<ExtractionError>();
                assert!(matches!(cause, Some(ExtractionError::Llm(_))));
            }
            other => panic!("Expected extraction error, got {:?}", other),
        }
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_irreparable_output_fails_analysis() {
        let llm = MockProvider::new("This is not JSON");
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm), AnalyzerConfig::default()).unwrap();

        let err = analyzer.analyze("Some text").await.unwrap_err();

        assert!(matches!(err, AnalysisError::Extraction { chunk: 1, .. }));
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_repair_attempt_recovers_chunk() {
        let llm = MockProvider::with_sequence(["Title = Report", r#"{"Title": "Report"}"#]);
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm.clone()), AnalyzerConfig::default())
                .unwrap();

        let metadata = analyzer.analyze_document("Some text").await.unwrap();

        assert_eq!(metadata["Title"], Value::from("Report"));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_extraction_merges_in_chunk_order() {
        let document = "aaaaaaaaaabbbbbbbbbbccccccccccdddddddddd";

        let sequential = DocumentAnalyzer::new(SlowLetterExtractor, small_chunks(1))
            .unwrap()
            .analyze_document(document)
            .await
            .unwrap();
        let concurrent = DocumentAnalyzer::new(SlowLetterExtractor, small_chunks(4))
            .unwrap()
            .analyze_document(document)
            .await
            .unwrap();

        assert_eq!(concurrent, sequential);
        assert_eq!(concurrent["title"], Value::from("a | b | c | d"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_failure_aborts_analysis() {
        let llm = MockProvider::with_sequence(["{}", "{}"]);
        llm.push_error();
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm), small_chunks(2)).unwrap();

        let result = analyzer.analyze(&"x".repeat(30)).await;
        assert!(matches!(result, Err(AnalysisError::Extraction { .. })));
    }

    #[tokio::test]
    async fn test_extraction_timeout() {
        let config = AnalyzerConfig {
            extraction_timeout_secs: 1,
            ..AnalyzerConfig::default()
        };
        let analyzer =
            DocumentAnalyzer::new(SleepyExtractor(Duration::from_millis(1500)), config).unwrap();

        let err = analyzer.analyze("Some text").await.unwrap_err();

        match err {
            AnalysisError::Extraction { chunk, source } => {
                assert_eq!(chunk, 1);
                assert!(matches!(
                    source.downcast_ref::<ExtractionError>(),
                    Some(ExtractionError::Timeout)
                ));
            }
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deadline_aborts_before_next_chunk() {
        let config = AnalyzerConfig {
            analysis_deadline_secs: Some(1),
            ..small_chunks(1)
        };
        let analyzer =
            DocumentAnalyzer::new(SleepyExtractor(Duration::from_millis(1100)), config).unwrap();

        let err = analyzer.analyze(&"x".repeat(30)).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::ExtractionAborted { next_chunk: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_mixed_types_across_chunks() {
        let llm = MockProvider::with_sequence([
            r#"{"Author": ["Ada"], "PageCount": "Not Available", "Language": "English"}"#,
            r#"{"Author": "Grace", "PageCount": 12, "Language": null}"#,
            r#"{"Author": "Ada", "PageCount": "Not Available", "Language": "English"}"#,
        ]);
        let analyzer =
            DocumentAnalyzer::new(LlmExtractor::new(llm), small_chunks(1)).unwrap();

        let report = analyzer.analyze(&"y".repeat(30)).await.unwrap();

        assert_eq!(
            report.to_json(),
            json!({
                "Author": ["Ada", "Grace"],
                "PageCount": "Not Available",
                "Language": "English"
            })
        );
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].key, "PageCount");
    }

    #[tokio::test]
    async fn test_config_toml_serialization() {
        let config = AnalyzerConfig::default();
        let toml_str = config.to_toml().unwrap();

        let parsed = AnalyzerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
