// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # partdocs
//!
//! Client for a partitioned, server-paginated document store.
//!
//! A list query returns one page of documents plus an opaque continuation
//! token. [`PaginatedCursor`] hides the paging: callers ask `has_more()` and
//! take documents one at a time with `next()`, and the cursor fetches the
//! next page when the current one runs out.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use partdocs::{CursorItem, DocumentsClient, StaticTokenProvider, TokenResult};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> partdocs::Result<()> {
//!     let token = TokenResult::new("readonly", "account", "db", "documents", "sig");
//!     let tokens = StaticTokenProvider::new().with_token("readonly", token);
//!     let client = DocumentsClient::from_config(&Default::default(), Arc::new(tokens))?;
//!
//!     let cursor = client.list::<serde_json::Value>("readonly").await;
//!     tokio::task::spawn_blocking(move || {
//!         let mut cursor = cursor;
//!         while cursor.has_more() {
//!             match cursor.next() {
//!                 CursorItem::Item(doc) => println!("{:?}", doc.id()),
//!                 CursorItem::Exhausted => break,
//!                 CursorItem::Failed(e) => eprintln!("{e}"),
//!             }
//!         }
//!     })
//!     .await
//!     .ok();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! DocumentsClient ── TokenProvider ── TokenResult
//!        │
//!   PageFetcher ── ListTransport (HttpClient) ── DocumentDecoder
//!        │
//!  PaginatedCursor ── Page ── DocumentWrapper
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types, header names and constants
pub mod types;

/// Document wrapper handed to callers
pub mod document;

/// Partition credentials
pub mod auth;

/// HTTP list transport
pub mod http;

/// Response decoders
pub mod decode;

/// Pages, page fetching and the paginated cursor
pub mod pagination;

/// Query entry point
pub mod client;

/// Client configuration
pub mod config;

/// CLI
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{StaticTokenProvider, TokenProvider, TokenResult};
pub use client::DocumentsClient;
pub use config::{load_config, ClientConfig};
pub use document::DocumentWrapper;
pub use error::{Error, FetchError, Result};
pub use pagination::{CursorItem, CursorState, Page, PageFetcher, PaginatedCursor};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
