//! Transport types
//!
//! Request and response of the list-page call, and the trait a transport
//! implements to serve it.

use crate::auth::TokenResult;
use crate::error::Result;
use crate::types::{header_value, StringMap, CONTINUATION_TOKEN_HEADER};
use async_trait::async_trait;
use std::sync::Arc;

/// One list-page request
#[derive(Debug, Clone)]
pub struct ListRequest {
    /// Credential for the partition being listed
    pub credential: Arc<TokenResult>,
    /// Token from the previous page, absent on the first call
    pub continuation_token: Option<String>,
    /// Page size hint sent to the server
    pub max_item_count: Option<u32>,
}

impl ListRequest {
    /// Create a request for the first page
    pub fn new(credential: Arc<TokenResult>) -> Self {
        Self {
            credential,
            continuation_token: None,
            max_item_count: None,
        }
    }

    /// Continue from a previous page
    #[must_use]
    pub fn continuation(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    /// Set the page size hint
    #[must_use]
    pub fn max_item_count(mut self, count: u32) -> Self {
        self.max_item_count = Some(count);
        self
    }
}

/// One list-page response
#[derive(Debug, Clone, Default)]
pub struct ListResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub payload: String,
    /// Response headers, names lower-cased
    pub headers: StringMap,
}

impl ListResponse {
    /// Create a 200 response
    pub fn ok(payload: impl Into<String>) -> Self {
        Self {
            status: 200,
            payload: payload.into(),
            headers: StringMap::new(),
        }
    }

    /// Add a response header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Continuation token for the next page; empty values count as absent
    pub fn continuation_token(&self) -> Option<String> {
        header_value(&self.headers, CONTINUATION_TOKEN_HEADER)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}

/// A transport able to list one page of documents
#[async_trait]
pub trait ListTransport: Send + Sync {
    /// Perform exactly one list call
    async fn list_documents(&self, request: &ListRequest) -> Result<ListResponse>;
}
