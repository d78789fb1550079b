//! Pagination module
//!
//! A server-paginated document query presented as one forward sequence.
//!
//! # Overview
//!
//! [`PageFetcher`] performs one list call per page and never fails: transport
//! and decode failures are folded into the returned [`Page`].
//! [`PaginatedCursor`] buffers one page at a time and asks the fetcher for the
//! next one only when the buffered page is used up and a continuation token
//! says the server has more.

mod cursor;
mod fetcher;
mod types;

pub use cursor::{Documents, IntoDocuments, PaginatedCursor};
pub use fetcher::PageFetcher;
pub use types::{CursorItem, CursorState, Page};
