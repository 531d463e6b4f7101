//! Command implementations.

pub mod analyze;
pub mod chunk;
pub mod profile;

pub use self::analyze::execute_analyze;
pub use self::chunk::execute_chunk;
pub use self::profile::execute_profile;

use crate::cli::{ChunkingArgs, InputArgs};
use crate::error::{CliError, Result};
use docmeta_analyzer::AnalyzerConfig;
use std::io::Read;

/// Read the document named by the input flags.
pub(crate) fn read_input(input: &InputArgs) -> Result<String> {
    match (&input.file, input.stdin) {
        (Some(path), _) => Ok(std::fs::read_to_string(path)?),
        (None, true) => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        (None, false) => Err(CliError::InvalidInput(
            "Provide a document with --file <path> or --stdin".to_string(),
        )),
    }
}

/// Apply chunking flags on top of the configured analyzer settings.
pub(crate) fn apply_chunking(config: &mut AnalyzerConfig, args: &ChunkingArgs) {
    if let Some(size) = args.chunk_size {
        config.max_chunk_size = size;
    }
    if let Some(overlap) = args.overlap {
        config.chunk_overlap = overlap;
    }
}
