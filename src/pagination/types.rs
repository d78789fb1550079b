//! Pagination types
//!
//! A [`Page`] is what one list call produced. [`CursorItem`] is what one step
//! of a cursor produces. [`CursorState`] names where a cursor stands.

use crate::document::DocumentWrapper;
use crate::error::FetchError;

/// One batch of documents from a single list call
#[derive(Debug, Clone)]
pub struct Page<T> {
    items: Vec<DocumentWrapper<T>>,
    error: Option<FetchError>,
    continuation_token: Option<String>,
}

impl<T> Page<T> {
    /// Create a successful page; empty tokens count as absent
    pub fn new(items: Vec<DocumentWrapper<T>>, continuation_token: Option<String>) -> Self {
        Self {
            items,
            error: None,
            continuation_token: continuation_token.filter(|token| !token.is_empty()),
        }
    }

    /// Create a page holding only a failure
    pub fn failed(error: FetchError) -> Self {
        Self {
            items: Vec::new(),
            error: Some(error),
            continuation_token: None,
        }
    }

    /// Documents in server order
    pub fn items(&self) -> &[DocumentWrapper<T>] {
        &self.items
    }

    /// Failure of the list call that produced this page
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Check if the list call failed
    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Token for the page after this one
    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    /// Number of documents on the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page holds no documents
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Split into documents, failure and continuation token
    pub fn into_parts(
        self,
    ) -> (
        Vec<DocumentWrapper<T>>,
        Option<FetchError>,
        Option<String>,
    ) {
        (self.items, self.error, self.continuation_token)
    }
}

/// Result of one cursor step
#[derive(Debug, Clone, PartialEq)]
pub enum CursorItem<T> {
    /// The next document (which may itself be a per-document failure)
    Item(DocumentWrapper<T>),
    /// No documents remain
    Exhausted,
    /// A page fetch failed; the cursor will not fetch again
    Failed(FetchError),
}

impl<T> CursorItem<T> {
    /// Check if this step produced a document
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }

    /// Check if this step hit the end of the sequence
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Fold terminal steps back into failure wrappers
    pub fn into_wrapper(self) -> DocumentWrapper<T> {
        match self {
            Self::Item(doc) => doc,
            Self::Exhausted => DocumentWrapper::failed(FetchError::Exhausted),
            Self::Failed(error) => DocumentWrapper::failed(error),
        }
    }

    /// The document, if this step produced one
    pub fn item(self) -> Option<DocumentWrapper<T>> {
        match self {
            Self::Item(doc) => Some(doc),
            _ => None,
        }
    }
}

/// Where a cursor stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Documents remain on the buffered page
    Buffered,
    /// Buffered page consumed, more pages on the server
    ExhaustedMoreAvailable,
    /// Buffered page consumed, no more pages
    ExhaustedFinal,
    /// A page fetch failed
    Failed,
}

impl CursorState {
    /// Check if another `next()` can still produce a document
    pub fn has_more(&self) -> bool {
        matches!(self, Self::Buffered | Self::ExhaustedMoreAvailable)
    }

    /// Check if the cursor can make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ExhaustedFinal | Self::Failed)
    }
}
