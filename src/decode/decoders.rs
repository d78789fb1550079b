//! Decoder implementations

use super::types::{DocumentDecoder, DocumentList, RawDocument};
use crate::document::DocumentWrapper;
use crate::error::{Error, FetchError, Result};
use chrono::{TimeZone, Utc};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::warn;

// ============================================================================
// JSON Document Decoder
// ============================================================================

/// JSON decoder for documents of type `T`
pub struct JsonDocumentDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocumentDecoder<T> {
    /// Create a new JSON document decoder
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDocumentDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonDocumentDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDocumentDecoder")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> DocumentDecoder<T> for JsonDocumentDecoder<T> {
    fn decode(&self, payload: &str) -> Result<Vec<DocumentWrapper<T>>> {
        let list: DocumentList = serde_json::from_str(payload)
            .map_err(|e| Error::decode(format!("Failed to parse document list: {e}")))?;

        if let Some(count) = list.count {
            if count != list.documents.len() as u64 {
                warn!(
                    "Document list reports {} documents but carries {}",
                    count,
                    list.documents.len()
                );
            }
        }

        Ok(list.documents.into_iter().map(decode_document).collect())
    }
}

/// Decode a single stored document; body mismatches become failure wrappers
fn decode_document<T: DeserializeOwned>(raw: RawDocument) -> DocumentWrapper<T> {
    let Some(last_updated) = Utc.timestamp_opt(raw.timestamp, 0).single() else {
        return DocumentWrapper::failed_at(
            FetchError::decode(format!("Invalid timestamp {}", raw.timestamp)),
            raw.partition,
            raw.id,
        );
    };

    let json = raw.document.to_string();
    match serde_json::from_value::<T>(raw.document) {
        Ok(value) => DocumentWrapper::new(value, raw.partition, raw.id, raw.etag, last_updated)
            .with_json_value(json),
        Err(e) => {
            warn!("Failed to decode document {}: {}", raw.id, e);
            DocumentWrapper::failed_at(
                FetchError::decode(format!("Failed to deserialize document: {e}")),
                raw.partition,
                raw.id,
            )
        }
    }
}

/// Decode a list payload into documents of type `T`
pub fn decode_documents<T: DeserializeOwned>(payload: &str) -> Result<Vec<DocumentWrapper<T>>> {
    JsonDocumentDecoder::<T>::new().decode(payload)
}
