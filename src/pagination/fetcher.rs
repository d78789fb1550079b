//! Page fetcher
//!
//! Performs one list call and folds every failure into the returned page.

use super::types::Page;
use crate::auth::TokenResult;
use crate::decode::{DocumentDecoder, JsonDocumentDecoder};
use crate::error::{Error, FetchError};
use crate::http::{ListRequest, ListTransport};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches pages of one partition
///
/// The transport, credential and decoder are shared handles owned by the
/// caller. Cloning a fetcher clones the handles, not the resources.
pub struct PageFetcher<T> {
    transport: Arc<dyn ListTransport>,
    credential: Arc<TokenResult>,
    decoder: Arc<dyn DocumentDecoder<T>>,
    max_item_count: Option<u32>,
}

impl<T: DeserializeOwned + 'static> PageFetcher<T> {
    /// Create a fetcher decoding JSON documents into `T`
    pub fn new(transport: Arc<dyn ListTransport>, credential: Arc<TokenResult>) -> Self {
        Self::with_decoder(transport, credential, Arc::new(JsonDocumentDecoder::new()))
    }
}

impl<T> PageFetcher<T> {
    /// Create a fetcher with a custom decoder
    pub fn with_decoder(
        transport: Arc<dyn ListTransport>,
        credential: Arc<TokenResult>,
        decoder: Arc<dyn DocumentDecoder<T>>,
    ) -> Self {
        Self {
            transport,
            credential,
            decoder,
            max_item_count: None,
        }
    }

    /// Set the page size hint sent with every request
    #[must_use]
    pub fn max_item_count(mut self, count: Option<u32>) -> Self {
        self.max_item_count = count;
        self
    }

    /// Partition being listed
    pub fn partition(&self) -> &str {
        &self.credential.partition
    }

    /// Fetch one page
    ///
    /// Makes exactly one transport call. Transport and decode failures come
    /// back as a failed page, never as an error.
    pub async fn fetch_page(&self, continuation_token: Option<&str>) -> Page<T> {
        let mut request = ListRequest::new(Arc::clone(&self.credential));
        if let Some(token) = continuation_token {
            request = request.continuation(token);
        }
        if let Some(count) = self.max_item_count {
            request = request.max_item_count(count);
        }

        debug!(
            "Fetching page of partition {} (continuation: {:?})",
            self.partition(),
            continuation_token
        );

        let response = match self.transport.list_documents(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("List call for partition {} failed: {}", self.partition(), e);
                return Page::failed(FetchError::from(&e));
            }
        };

        if !(200..300).contains(&response.status) {
            let err = Error::http_status(response.status, response.payload);
            warn!("List call for partition {} failed: {}", self.partition(), err);
            return Page::failed(FetchError::from(&err));
        }

        let next_token = response.continuation_token();
        match self.decoder.decode(&response.payload) {
            Ok(items) => {
                debug!(
                    "Fetched {} documents (more pages: {})",
                    items.len(),
                    next_token.is_some()
                );
                Page::new(items, next_token)
            }
            Err(e) => {
                warn!("Failed to decode page of partition {}: {}", self.partition(), e);
                Page::failed(FetchError::from(&e))
            }
        }
    }
}

impl<T> Clone for PageFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            credential: Arc::clone(&self.credential),
            decoder: Arc::clone(&self.decoder),
            max_item_count: self.max_item_count,
        }
    }
}

impl<T> std::fmt::Debug for PageFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("partition", &self.credential.partition)
            .field("max_item_count", &self.max_item_count)
            .finish_non_exhaustive()
    }
}
