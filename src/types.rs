//! Common types used throughout partdocs
//!
//! This module contains shared type definitions, type aliases,
//! and the wire constants of the document list API.

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Partitions
// ============================================================================

/// Well-known partition names
#[derive(Debug, Clone, Copy)]
pub struct DefaultPartitions;

impl DefaultPartitions {
    /// Documents private to the signed-in user
    pub const USER_DOCUMENTS: &'static str = "user";

    /// Documents readable by every installation of the app
    pub const APP_DOCUMENTS: &'static str = "readonly";
}

// ============================================================================
// Wire constants
// ============================================================================

/// Response header carrying the continuation token for the next page
pub const CONTINUATION_TOKEN_HEADER: &str = "x-ms-continuation";

/// Request header naming the partition key being listed
pub const PARTITION_KEY_HEADER: &str = "x-ms-documentdb-partitionkey";

/// Request header capping the number of documents per page
pub const MAX_ITEM_COUNT_HEADER: &str = "x-ms-max-item-count";

/// Request header carrying the service API version
pub const API_VERSION_HEADER: &str = "x-ms-version";

/// Request header carrying the request date
pub const DATE_HEADER: &str = "x-ms-date";

/// Service API version sent when the config does not override it
pub const DEFAULT_API_VERSION: &str = "2018-06-18";

/// Lower-cased header lookup over a response header map
pub fn header_value<'a>(headers: &'a StringMap, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
