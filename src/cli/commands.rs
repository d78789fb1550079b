//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Partitioned document store CLI
#[derive(Parser, Debug)]
#[command(name = "partdocs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Credential file (JSON token result for the partition)
    #[arg(short, long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every document of a partition
    List {
        /// Partition to list
        #[arg(short, long, default_value = "readonly")]
        partition: String,

        /// Stop after this many documents
        #[arg(long)]
        limit: Option<usize>,

        /// Defer the first request until the first document is read
        #[arg(long)]
        lazy: bool,
    },

    /// Fetch a single page
    Page {
        /// Partition to list
        #[arg(short, long, default_value = "readonly")]
        partition: String,

        /// Continuation token from a previous page
        #[arg(long)]
        continuation: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
