//! Document wrapper
//!
//! One logical result of a document query: either a document with its server
//! metadata, or a failure marker.

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A document read from a partition, or the failure that replaced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentWrapper<T> {
    id: Option<String>,
    partition: Option<String>,
    etag: Option<String>,
    last_updated_date: Option<DateTime<Utc>>,
    from_device_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    deserialized_value: Option<T>,
    #[serde(skip)]
    json_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FetchError>,
}

impl<T> DocumentWrapper<T> {
    /// Create a successfully read document
    pub fn new(
        value: T,
        partition: impl Into<String>,
        id: impl Into<String>,
        etag: Option<String>,
        last_updated_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            partition: Some(partition.into()),
            etag,
            last_updated_date: Some(last_updated_date),
            from_device_cache: false,
            deserialized_value: Some(value),
            json_value: None,
            error: None,
        }
    }

    /// Create a failure marker
    pub fn failed(error: FetchError) -> Self {
        Self {
            id: None,
            partition: None,
            etag: None,
            last_updated_date: None,
            from_device_cache: false,
            deserialized_value: None,
            json_value: None,
            error: Some(error),
        }
    }

    /// Create a failure marker for a document whose location is known but
    /// whose body could not be read
    pub(crate) fn failed_at(
        error: FetchError,
        partition: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            partition: Some(partition.into()),
            ..Self::failed(error)
        }
    }

    /// Attach the raw JSON text of the document body
    #[must_use]
    pub fn with_json_value(mut self, json: impl Into<String>) -> Self {
        self.json_value = Some(json.into());
        self
    }

    /// Document id
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Partition the document lives in
    pub fn partition(&self) -> Option<&str> {
        self.partition.as_deref()
    }

    /// Optimistic-concurrency version stamp
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Time of the last server-side write
    pub fn last_updated_date(&self) -> Option<DateTime<Utc>> {
        self.last_updated_date
    }

    /// Whether this result came from the local device cache
    pub fn is_from_device_cache(&self) -> bool {
        self.from_device_cache
    }

    /// Decoded document body
    pub fn value(&self) -> Option<&T> {
        self.deserialized_value.as_ref()
    }

    /// Raw JSON text of the document body
    pub fn json_value(&self) -> Option<&str> {
        self.json_value.as_deref()
    }

    /// Failure carried instead of a document
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Whether this wrapper is a failure marker
    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Take the decoded body, or the failure if there is one
    pub fn into_result(self) -> Result<T, FetchError> {
        match (self.error, self.deserialized_value) {
            (Some(error), _) => Err(error),
            (None, Some(value)) => Ok(value),
            (None, None) => Err(FetchError::decode("document has no value")),
        }
    }
}
