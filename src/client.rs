//! Document query entry point
//!
//! [`DocumentsClient`] issues list queries against a partition and hands back
//! a [`PaginatedCursor`] over the result.

use crate::auth::{TokenProvider, TokenResult};
use crate::config::ClientConfig;
use crate::error::{FetchError, Result};
use crate::http::{HttpClient, ListTransport};
use crate::pagination::{PageFetcher, PaginatedCursor};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Client listing documents of a partition
pub struct DocumentsClient {
    transport: Arc<dyn ListTransport>,
    tokens: Arc<dyn TokenProvider>,
    max_item_count: Option<u32>,
}

impl DocumentsClient {
    /// Create a client over a transport and a credential provider
    pub fn new(transport: Arc<dyn ListTransport>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            transport,
            tokens,
            max_item_count: None,
        }
    }

    /// Create a client using the HTTP transport described by `config`
    pub fn from_config(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(config.http_config())?;
        Ok(Self::new(Arc::new(http), tokens).max_item_count(config.max_item_count))
    }

    /// Set the page size hint for every query
    #[must_use]
    pub fn max_item_count(mut self, count: Option<u32>) -> Self {
        self.max_item_count = count;
        self
    }

    /// Build a fetcher bound to the credential of `partition`
    async fn fetcher<T>(&self, partition: &str) -> Result<PageFetcher<T>>
    where
        T: DeserializeOwned + 'static,
    {
        let credential: TokenResult = self.tokens.get_token(partition).await?;
        Ok(
            PageFetcher::new(Arc::clone(&self.transport), Arc::new(credential))
                .max_item_count(self.max_item_count),
        )
    }

    /// List a partition, fetching the first page before returning
    ///
    /// Never fails: a missing credential or a failed first fetch produce a
    /// cursor in the failed state. Must be called on a tokio runtime; the
    /// cursor fetches later pages on that runtime. Blocking `next()` needs a
    /// multi-thread runtime; on a current-thread runtime read the cursor with
    /// `next_async`, `next_page` or `into_stream`.
    pub async fn list<T>(&self, partition: &str) -> PaginatedCursor<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let fetcher = match self.fetcher::<T>(partition).await {
            Ok(fetcher) => fetcher,
            Err(e) => {
                warn!("Cannot list partition {}: {}", partition, e);
                return PaginatedCursor::failed(FetchError::from(&e));
            }
        };

        let first_page = fetcher.fetch_page(None).await;
        debug!(
            "First page of partition {}: {} documents",
            partition,
            first_page.len()
        );
        PaginatedCursor::new(fetcher, first_page, Handle::current())
    }

    /// List a partition without fetching; the first `next()` does
    pub async fn list_lazy<T>(&self, partition: &str) -> PaginatedCursor<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match self.fetcher::<T>(partition).await {
            Ok(fetcher) => PaginatedCursor::lazy(fetcher, Handle::current()),
            Err(e) => {
                warn!("Cannot list partition {}: {}", partition, e);
                PaginatedCursor::failed(FetchError::from(&e))
            }
        }
    }

    /// Resume a listing from a continuation token saved earlier
    pub async fn resume<T>(&self, partition: &str, continuation_token: &str) -> PaginatedCursor<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match self.fetcher::<T>(partition).await {
            Ok(fetcher) => PaginatedCursor::resume(fetcher, continuation_token, Handle::current()),
            Err(e) => {
                warn!("Cannot resume partition {}: {}", partition, e);
                PaginatedCursor::failed(FetchError::from(&e))
            }
        }
    }
}

impl std::fmt::Debug for DocumentsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentsClient")
            .field("max_item_count", &self.max_item_count)
            .finish_non_exhaustive()
    }
}
