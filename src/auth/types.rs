//! Credential types
//!
//! A `TokenResult` is the record handed back by the token exchange for one
//! partition. It says where the partition lives and how to authorize requests
//! against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds before expiry at which a token is already treated as expired
const EXPIRY_BUFFER_SECONDS: i64 = 30;

/// Resource token for one partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResult {
    /// Resolved partition key (e.g. `readonly` or `user-<account id>`)
    pub partition: String,
    /// Database account name, the first label of the endpoint host
    pub db_account: String,
    /// Database name
    pub db_name: String,
    /// Collection holding the partition
    pub db_collection_name: String,
    /// Authorization header value
    pub token: String,
    /// Exchange status (e.g. `Succeed`)
    #[serde(default)]
    pub status: Option<String>,
    /// When the token stops being accepted
    #[serde(default)]
    pub expires_on: Option<DateTime<Utc>>,
    /// Account the user partition belongs to
    #[serde(default)]
    pub account_id: Option<String>,
}

impl TokenResult {
    /// Create a token that never expires
    pub fn new(
        partition: impl Into<String>,
        db_account: impl Into<String>,
        db_name: impl Into<String>,
        db_collection_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            partition: partition.into(),
            db_account: db_account.into(),
            db_name: db_name.into(),
            db_collection_name: db_collection_name.into(),
            token: token.into(),
            status: None,
            expires_on: None,
            account_id: None,
        }
    }

    /// Set the expiry time
    #[must_use]
    pub fn expires_on(mut self, expires_on: DateTime<Utc>) -> Self {
        self.expires_on = Some(expires_on);
        self
    }

    /// Set the owning account id
    #[must_use]
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_on {
            Some(expires_on) => {
                let buffer = chrono::Duration::seconds(EXPIRY_BUFFER_SECONDS);
                Utc::now() + buffer >= expires_on
            }
            None => false,
        }
    }
}
