//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};

/// Docmeta CLI - Extract merged metadata from long documents with an LLM.
#[derive(Debug, Parser)]
#[command(name = "docmeta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DOCMETA_CONFIG")]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (key=value lines)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract merged metadata from a document
    Analyze(AnalyzeArgs),

    /// Show how a document would be chunked, without calling a model
    Chunk(ChunkArgs),

    /// Manage model profiles
    Profile(ProfileArgs),
}

/// Where to read a document from.
#[derive(Debug, Clone, Parser)]
pub struct InputArgs {
    /// Document file to read
    #[arg(long, conflicts_with = "stdin")]
    pub file: Option<String>,

    /// Read the document from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Chunking overrides shared by analyze and chunk.
#[derive(Debug, Clone, Parser)]
pub struct ChunkingArgs {
    /// Maximum chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared between neighbouring chunks
    #[arg(long)]
    pub overlap: Option<usize>,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub chunking: ChunkingArgs,

    /// Chunks extracted at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-chunk extraction timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Answer every prompt with this JSON instead of calling a model
    #[arg(long)]
    pub mock_response: Option<String>,
}

/// Arguments for the chunk command.
#[derive(Debug, Parser)]
pub struct ChunkArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub chunking: ChunkingArgs,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Ollama endpoint URL
        #[arg(short, long, default_value = docmeta_llm::ollama::DEFAULT_ENDPOINT)]
        endpoint: String,
        /// Model name
        #[arg(short, long)]
        model: String,
        /// Maximum request attempts
        #[arg(long, default_value_t = docmeta_llm::ollama::DEFAULT_MAX_RETRIES)]
        max_retries: u32,
        /// Per-request timeout in seconds
        #[arg(long, default_value_t = docmeta_llm::ollama::DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
