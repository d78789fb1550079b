//! Error types for partdocs
//!
//! Two layers live here. [`Error`] is the crate-wide error returned by every
//! fallible API. [`FetchError`] is the cloneable failure *value* carried inside
//! pages and document wrappers, because the cursor protocol never raises.

use serde::Serialize;
use thiserror::Error;

/// The main error type for partdocs
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("No credential available for partition '{partition}'")]
    MissingCredential { partition: String },

    #[error("Credential for partition '{partition}' has expired")]
    ExpiredCredential { partition: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Cursor Errors
    // ============================================================================
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
        }
    }

    /// Check if this error came from reading a payload rather than the network
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::JsonParse(_))
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for partdocs
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

// ============================================================================
// Fetch failures carried as data
// ============================================================================

/// A failure stored inside a [`Page`](crate::pagination::Page) or a
/// [`DocumentWrapper`](crate::document::DocumentWrapper).
///
/// Unlike [`Error`] this is `Clone`, so a failed cursor can hand out the same
/// cause on every call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// Network, HTTP or credential failure while listing a page
    #[error("transport failure: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// The payload could not be read into the expected shape
    #[error("decode failure: {message}")]
    Decode { message: String },

    /// Iteration was requested past the last document
    #[error("no more documents")]
    Exhausted,
}

impl FetchError {
    /// Create a transport failure without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Create a decode failure
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Check if this failure marks the end of iteration
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

impl From<&Error> for FetchError {
    fn from(err: &Error) -> Self {
        if err.is_decode() {
            return Self::decode(err.to_string());
        }
        Self::Transport {
            message: err.to_string(),
            status: err.status(),
        }
    }
}

impl From<Error> for FetchError {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::unsupported("remove");
        assert_eq!(err.to_string(), "Unsupported operation: remove");
    }

    #[test]
    fn test_fetch_error_from_http_status() {
        let fetch = FetchError::from(Error::http_status(503, "busy"));
        assert_eq!(
            fetch,
            FetchError::Transport {
                message: "HTTP 503: busy".to_string(),
                status: Some(503),
            }
        );
    }

    #[test]
    fn test_fetch_error_from_decode() {
        let fetch = FetchError::from(Error::decode("missing Documents"));
        assert!(matches!(fetch, FetchError::Decode { .. }));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let fetch = FetchError::from(Error::from(json_err));
        assert!(matches!(fetch, FetchError::Decode { .. }));
    }

    #[test]
    fn test_fetch_error_credential_is_transport() {
        let fetch = FetchError::from(Error::MissingCredential {
            partition: "user".to_string(),
        });
        assert!(matches!(fetch, FetchError::Transport { status: None, .. }));
    }

    #[test]
    fn test_exhausted() {
        assert!(FetchError::Exhausted.is_exhausted());
        assert!(!FetchError::transport("down").is_exhausted());
        assert_eq!(FetchError::Exhausted.to_string(), "no more documents");
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
