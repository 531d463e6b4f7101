//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use docmeta_analyzer::{AnalysisReport, TextChunk};
use docmeta_domain::TypeConflict;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Chars of chunk text shown in the chunk table preview column.
const PREVIEW_CHARS: usize = 48;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an analysis report.
    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&report.to_json())?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(format_report_quiet(report)),
        }
    }

    fn format_report_table(&self, report: &AnalysisReport) -> String {
        if report.metadata.is_empty() {
            return self.colorize("No metadata extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, value) in &report.metadata {
            builder.push_record([key.clone(), value.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{}",
            table,
            self.info(&format!(
                "{} chunk(s) in {} ms",
                report.chunk_count, report.processing_time_ms
            ))
        )
    }

    /// Format the chunks a document would be split into.
    pub fn format_chunks(&self, chunks: &[TextChunk]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = chunks
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "index": c.index,
                            "start": c.start,
                            "end": c.end,
                            "text": c.text,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => Ok(self.format_chunks_table(chunks)),
            OutputFormat::Quiet => Ok(chunks
                .iter()
                .map(|c| format!("{}\t{}\t{}", c.index, c.start, c.end))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_chunks_table(&self, chunks: &[TextChunk]) -> String {
        if chunks.is_empty() {
            return self.colorize("Document is empty.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Start", "End", "Chars", "Preview"]);
        for chunk in chunks {
            builder.push_record([
                chunk.index.to_string(),
                chunk.start.to_string(),
                chunk.end.to_string(),
                chunk.char_len().to_string(),
                preview(&chunk.text),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Describe a value the merge dropped.
    pub fn conflict(&self, conflict: &TypeConflict) -> String {
        self.warning(&format!(
            "Dropped {} value for '{}' from chunk {}: field already holds a {}",
            conflict.incoming_kind,
            conflict.key,
            conflict.record_index + 1,
            conflict.existing_kind
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// One `key=value` line per field.
fn format_report_quiet(report: &AnalysisReport) -> String {
    report
        .metadata
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", cut)
}
