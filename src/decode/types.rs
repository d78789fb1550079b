//! Decoder types and traits
//!
//! Wire shape of the list payload and the decoder abstraction.

use crate::document::DocumentWrapper;
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;

/// Body of a list-page response
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    /// Documents in server order
    #[serde(rename = "Documents")]
    pub documents: Vec<RawDocument>,
    /// Number of documents the server reports for this page
    #[serde(rename = "_count", default)]
    pub count: Option<u64>,
}

/// One stored document before its body is decoded
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    /// Document id
    pub id: String,
    /// Partition key the document is stored under
    #[serde(rename = "PartitionKey")]
    pub partition: String,
    /// Version stamp
    #[serde(rename = "_etag", default)]
    pub etag: Option<String>,
    /// Last write, seconds since the Unix epoch
    #[serde(rename = "_ts")]
    pub timestamp: i64,
    /// Application payload
    #[serde(default)]
    pub document: Value,
}

/// Trait for decoding a list payload into typed documents
pub trait DocumentDecoder<T>: Send + Sync {
    /// Decode one page payload
    fn decode(&self, payload: &str) -> Result<Vec<DocumentWrapper<T>>>;
}
