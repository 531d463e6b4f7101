//! Chunk command implementation.

use super::{apply_chunking, read_input};
use crate::cli::ChunkArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use docmeta_analyzer::TextChunker;

/// Execute the chunk command.
pub fn execute_chunk(args: ChunkArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_input(&args.input)?;

    let mut analyzer_config = config.analyzer.clone();
    apply_chunking(&mut analyzer_config, &args.chunking);
    let chunker = TextChunker::from_config(&analyzer_config)?;

    let chunks = chunker.chunk_spans(&text);
    println!("{}", formatter.format_chunks(&chunks)?);
    Ok(())
}
