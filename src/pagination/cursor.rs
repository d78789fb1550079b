//! Paginated cursor
//!
//! Presents a continuation-token listing as one forward sequence of
//! documents. Pages are fetched on demand, only when the buffered page runs
//! out.
//!
//! # Blocking
//!
//! [`PaginatedCursor::next`] blocks the calling thread while a page is
//! fetched. The fetch runs on the tokio runtime the cursor was created with
//! and hands its page back over a oneshot channel. Never call `next` from
//! inside an async task or an event-loop thread: tokio refuses to block a
//! runtime worker and panics. Drive the cursor from
//! `tokio::task::spawn_blocking` or a dedicated thread, or use
//! [`PaginatedCursor::next_async`] / [`PaginatedCursor::into_stream`] from
//! async code.
//!
//! The blocking path needs a multi-thread runtime. A current-thread runtime
//! only runs spawned work inside its own `block_on`, so a cursor created on
//! one answers a blocking page fetch with [`CursorItem::Failed`] instead of
//! waiting forever. On such a runtime use the async methods.

use super::fetcher::PageFetcher;
use super::types::{CursorItem, CursorState, Page};
use crate::document::DocumentWrapper;
use crate::error::{Error, FetchError, Result};
use futures::stream::{self, Stream};
use std::cell::Cell;
use std::marker::PhantomData;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

/// Where the next page comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Continuation {
    /// The first page has not been requested yet
    Initial,
    /// The server handed out a token for the next page
    Token(String),
    /// No further pages
    Done,
}

impl Continuation {
    fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.is_empty() => Self::Token(token),
            _ => Self::Done,
        }
    }
}

/// What the cursor does next, decided without touching the network
enum Step<T> {
    Yield(CursorItem<T>),
    Fetch(Option<String>),
}

/// Fetcher plus the runtime its futures are driven on
struct PageSource<T> {
    fetcher: PageFetcher<T>,
    runtime: Handle,
}

/// Forward-only cursor over a paginated document query
///
/// The cursor is single-owner: every state change goes through `&mut self`,
/// and it is `!Sync`, so it can be moved to a worker thread but never shared
/// between threads.
///
/// Blocking `next()` only works when the runtime handle belongs to a
/// multi-thread runtime; with a current-thread handle a page-boundary fetch
/// fails at once. See the module docs.
pub struct PaginatedCursor<T> {
    source: Option<PageSource<T>>,
    buffer: std::vec::IntoIter<DocumentWrapper<T>>,
    page_len: usize,
    page_error: Option<FetchError>,
    continuation: Continuation,
    pages_fetched: usize,
    _not_sync: PhantomData<Cell<()>>,
}

impl<T> PaginatedCursor<T> {
    /// Create a cursor over an already fetched first page
    pub fn new(fetcher: PageFetcher<T>, first_page: Page<T>, runtime: Handle) -> Self {
        let mut cursor = Self::with_source(
            Some(PageSource { fetcher, runtime }),
            Continuation::Done,
        );
        cursor.install(first_page);
        cursor
    }

    /// Create a cursor whose first page is fetched by the first `next()`
    pub fn lazy(fetcher: PageFetcher<T>, runtime: Handle) -> Self {
        Self::with_source(
            Some(PageSource { fetcher, runtime }),
            Continuation::Initial,
        )
    }

    /// Create a cursor that resumes a listing from a saved continuation token
    pub fn resume(
        fetcher: PageFetcher<T>,
        continuation_token: impl Into<String>,
        runtime: Handle,
    ) -> Self {
        Self::with_source(
            Some(PageSource { fetcher, runtime }),
            Continuation::from_token(Some(continuation_token.into())),
        )
    }

    /// Create a cursor that failed before any page could be requested
    pub fn failed(error: FetchError) -> Self {
        let mut cursor = Self::with_source(None, Continuation::Done);
        cursor.install(Page::failed(error));
        cursor
    }

    fn with_source(source: Option<PageSource<T>>, continuation: Continuation) -> Self {
        Self {
            source,
            buffer: Vec::new().into_iter(),
            page_len: 0,
            page_error: None,
            continuation,
            pages_fetched: 0,
            _not_sync: PhantomData,
        }
    }

    /// Current state of the cursor
    pub fn state(&self) -> CursorState {
        if self.page_error.is_some() {
            CursorState::Failed
        } else if !self.buffer.as_slice().is_empty() {
            CursorState::Buffered
        } else if self.continuation == Continuation::Done {
            CursorState::ExhaustedFinal
        } else {
            CursorState::ExhaustedMoreAvailable
        }
    }

    /// Check if another `next()` may produce a document
    ///
    /// Optimistic: with the buffered page consumed, a pending continuation
    /// token is enough to answer `true`, even though the next page may turn
    /// out empty or fail. Once a failure is installed this answers `false`.
    pub fn has_more(&self) -> bool {
        self.state().has_more()
    }

    /// Check if another page can be requested from the server
    pub fn has_next_page(&self) -> bool {
        self.page_error.is_none() && self.continuation != Continuation::Done
    }

    /// Token that will be sent with the next page request
    pub fn continuation_token(&self) -> Option<&str> {
        match &self.continuation {
            Continuation::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Documents of the buffered page not yet returned
    pub fn remaining(&self) -> &[DocumentWrapper<T>] {
        self.buffer.as_slice()
    }

    /// Index of the next document within the buffered page
    pub fn offset(&self) -> usize {
        self.page_len - self.buffer.len()
    }

    /// Number of pages installed so far, failed ones included
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Failure that stopped the cursor, if any
    pub fn error(&self) -> Option<&FetchError> {
        self.page_error.as_ref()
    }

    /// Removing through the cursor is not supported; always rejected
    pub fn remove(&mut self) -> Result<()> {
        error!("Remove operation is not supported by the document cursor");
        Err(Error::unsupported("remove"))
    }

    /// Decide the next step from buffered state alone
    fn step(&mut self) -> Step<T> {
        if let Some(error) = &self.page_error {
            return Step::Yield(CursorItem::Failed(error.clone()));
        }
        if let Some(item) = self.buffer.next() {
            return Step::Yield(CursorItem::Item(item));
        }
        match &self.continuation {
            Continuation::Done => Step::Yield(CursorItem::Exhausted),
            Continuation::Initial => Step::Fetch(None),
            Continuation::Token(token) => Step::Fetch(Some(token.clone())),
        }
    }

    /// Replace the buffered page
    fn install(&mut self, page: Page<T>) {
        let (items, error, token) = page.into_parts();
        self.pages_fetched += 1;
        self.page_len = items.len();
        self.buffer = items.into_iter();

        if let Some(error) = error {
            self.page_error = Some(error);
            self.continuation = Continuation::Done;
            return;
        }

        self.continuation = Continuation::from_token(token);
        if self.page_len == 0 && self.continuation != Continuation::Done {
            debug!("Received empty page that still carries a continuation token");
        }
    }

    /// Fetch and install the next page, asynchronously
    ///
    /// Unread documents of the buffered page are dropped. Without a pending
    /// token this returns [`FetchError::Exhausted`] and makes no call.
    pub async fn next_page(
        &mut self,
    ) -> std::result::Result<&[DocumentWrapper<T>], FetchError> {
        if let Some(error) = &self.page_error {
            return Err(error.clone());
        }
        let token = match &self.continuation {
            Continuation::Done => return Err(FetchError::Exhausted),
            Continuation::Initial => None,
            Continuation::Token(token) => Some(token.clone()),
        };

        let page = fetch_from(self.source.as_ref(), token.as_deref()).await;
        self.install(page);

        match &self.page_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.buffer.as_slice()),
        }
    }

    /// Asynchronous form of [`next`](Self::next) for callers already on a
    /// runtime
    pub async fn next_async(&mut self) -> CursorItem<T> {
        loop {
            match self.step() {
                Step::Yield(item) => return item,
                Step::Fetch(token) => {
                    let page = fetch_from(self.source.as_ref(), token.as_deref()).await;
                    self.install(page);
                }
            }
        }
    }
}

impl<T: Send + 'static> PaginatedCursor<T> {
    /// Return the next document, fetching a page if the buffered one is used up
    ///
    /// Never fails: the end of the sequence is [`CursorItem::Exhausted`] and a
    /// failed fetch is [`CursorItem::Failed`], repeated unchanged on every
    /// later call without touching the network. Empty pages that still carry
    /// a continuation token are skipped within the same call.
    ///
    /// Blocks while a page is fetched; see the module docs.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> CursorItem<T> {
        loop {
            match self.step() {
                Step::Yield(item) => return item,
                Step::Fetch(token) => {
                    let page = self.fetch_blocking(token);
                    self.install(page);
                }
            }
        }
    }

    /// Run one fetch on the runtime and wait for its page
    fn fetch_blocking(&self, token: Option<String>) -> Page<T> {
        let Some(source) = &self.source else {
            return Page::failed(FetchError::transport("cursor has no page source"));
        };

        // A current-thread runtime only makes progress inside its own
        // block_on, so a fetch spawned on it would never complete.
        if source.runtime.runtime_flavor() == RuntimeFlavor::CurrentThread {
            warn!("Cannot block on a page fetch driven by a current-thread runtime");
            return Page::failed(FetchError::transport(
                "blocking next() needs a multi-thread runtime; use next_async() on a current-thread runtime",
            ));
        }

        let (tx, rx) = oneshot::channel();
        let fetcher = source.fetcher.clone();
        source.runtime.spawn(async move {
            let page = fetcher.fetch_page(token.as_deref()).await;
            // The receiver only disappears if the waiting thread is gone.
            let _ = tx.send(page);
        });

        rx.blocking_recv().unwrap_or_else(|_| {
            warn!("Page fetch was dropped before completing");
            Page::failed(FetchError::transport("page fetch was abandoned"))
        })
    }

    /// Borrowing iterator over the remaining documents
    pub fn documents(&mut self) -> Documents<'_, T> {
        Documents {
            cursor: self,
            finished: false,
        }
    }

    /// Asynchronous stream over the remaining documents
    ///
    /// Yields `Ok` documents, then one `Err` if a page fetch fails.
    pub fn into_stream(
        self,
    ) -> impl Stream<Item = std::result::Result<DocumentWrapper<T>, FetchError>> + Send {
        stream::unfold((self, false), |(mut cursor, finished)| async move {
            if finished {
                return None;
            }
            match cursor.next_async().await {
                CursorItem::Item(doc) => Some((Ok(doc), (cursor, false))),
                CursorItem::Failed(error) => Some((Err(error), (cursor, true))),
                CursorItem::Exhausted => None,
            }
        })
    }
}

/// Fetch one page on the caller's runtime
async fn fetch_from<T>(source: Option<&PageSource<T>>, token: Option<&str>) -> Page<T> {
    match source {
        Some(source) => source.fetcher.fetch_page(token).await,
        None => Page::failed(FetchError::transport("cursor has no page source")),
    }
}

/// Advance an iterator adapter by one cursor step
fn iterate<T: Send + 'static>(
    cursor: &mut PaginatedCursor<T>,
    finished: &mut bool,
) -> Option<std::result::Result<DocumentWrapper<T>, FetchError>> {
    if *finished {
        return None;
    }
    match cursor.next() {
        CursorItem::Item(doc) => Some(Ok(doc)),
        CursorItem::Failed(error) => {
            *finished = true;
            Some(Err(error))
        }
        CursorItem::Exhausted => {
            *finished = true;
            None
        }
    }
}

/// Iterator borrowing a cursor; see [`PaginatedCursor::documents`]
///
/// Yields `Ok` documents in server order, then a single `Err` if a page fetch
/// fails, then `None`. Blocks at page boundaries like `next()`.
pub struct Documents<'a, T> {
    cursor: &'a mut PaginatedCursor<T>,
    finished: bool,
}

impl<T: Send + 'static> Iterator for Documents<'_, T> {
    type Item = std::result::Result<DocumentWrapper<T>, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        iterate(self.cursor, &mut self.finished)
    }
}

/// Owning iterator over a cursor
pub struct IntoDocuments<T> {
    cursor: PaginatedCursor<T>,
    finished: bool,
}

impl<T: Send + 'static> Iterator for IntoDocuments<T> {
    type Item = std::result::Result<DocumentWrapper<T>, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        iterate(&mut self.cursor, &mut self.finished)
    }
}

impl<T: Send + 'static> IntoIterator for PaginatedCursor<T> {
    type Item = std::result::Result<DocumentWrapper<T>, FetchError>;
    type IntoIter = IntoDocuments<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoDocuments {
            cursor: self,
            finished: false,
        }
    }
}

impl<T> std::fmt::Debug for PaginatedCursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedCursor")
            .field("state", &self.state())
            .field("offset", &self.offset())
            .field("page_len", &self.page_len)
            .field("continuation", &self.continuation)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
