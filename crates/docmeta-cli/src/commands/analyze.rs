//! Analyze command implementation.

use super::{apply_chunking, read_input};
use crate::cli::AnalyzeArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use docmeta_analyzer::{AnalysisReport, AnalyzerConfig, DocumentAnalyzer, LlmExtractor};
use docmeta_domain::traits::LlmProvider;
use docmeta_llm::MockProvider;
use tracing::info;

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let text = read_input(&args.input)?;

    let mut analyzer_config = config.analyzer.clone();
    apply_chunking(&mut analyzer_config, &args.chunking);
    if let Some(concurrency) = args.concurrency {
        analyzer_config.max_concurrent_extractions = concurrency;
    }
    if let Some(timeout) = args.timeout {
        analyzer_config.extraction_timeout_secs = timeout;
    }

    let report = match args.mock_response {
        Some(response) => analyze_with(MockProvider::new(response), analyzer_config, &text).await?,
        None => {
            let profile = config.get_active_profile()?;
            info!(
                "Using profile '{}' ({} at {})",
                config.active_profile, profile.model, profile.endpoint
            );
            analyze_with(profile.provider(), analyzer_config, &text).await?
        }
    };

    if formatter.format() == OutputFormat::Table {
        for conflict in &report.conflicts {
            eprintln!("{}", formatter.conflict(conflict));
        }
    }
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

/// Run the analysis pipeline against any LLM provider.
pub async fn analyze_with<L>(
    provider: L,
    config: AnalyzerConfig,
    text: &str,
) -> Result<AnalysisReport>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let analyzer = DocumentAnalyzer::new(LlmExtractor::new(provider), config)?;
    Ok(analyzer.analyze(text).await?)
}
