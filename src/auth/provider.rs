//! Token providers
//!
//! The document client never acquires credentials itself; it asks a
//! [`TokenProvider`] for the token of the partition being listed.

use super::types::TokenResult;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Source of per-partition credentials
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a valid token for `partition`
    async fn get_token(&self, partition: &str) -> Result<TokenResult>;
}

/// Provider serving tokens that were acquired ahead of time
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    tokens: HashMap<String, TokenResult>,
}

impl StaticTokenProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the token for a partition name
    #[must_use]
    pub fn with_token(mut self, partition: impl Into<String>, token: TokenResult) -> Self {
        self.insert(partition, token);
        self
    }

    /// Register or replace the token for a partition name
    pub fn insert(&mut self, partition: impl Into<String>, token: TokenResult) {
        self.tokens.insert(partition.into(), token);
    }

    /// Number of registered partitions
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if no partition has a token
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, partition: &str) -> Result<TokenResult> {
        let token = self
            .tokens
            .get(partition)
            .ok_or_else(|| Error::MissingCredential {
                partition: partition.to_string(),
            })?;

        if token.is_expired() {
            return Err(Error::ExpiredCredential {
                partition: partition.to_string(),
            });
        }

        debug!("Using cached token for partition {}", partition);
        Ok(token.clone())
    }
}
