//! CLI module
//!
//! Command-line interface for listing documents.
//!
//! # Commands
//!
//! - `list` - Print every document of a partition, page by page
//! - `page` - Print one page and the token for the page after it

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
