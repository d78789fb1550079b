//! HTTP client for the document list API
//!
//! Provides a reqwest-backed transport that handles:
//! - Endpoint resolution from the partition credential
//! - Service headers (partition key, API version, date, authorization)
//! - Continuation token and page size propagation
//! - Error classification into status, timeout and connection failures

use super::types::{ListRequest, ListResponse, ListTransport};
use crate::auth::TokenResult;
use crate::error::{Error, Result};
use crate::types::{
    StringMap, API_VERSION_HEADER, CONTINUATION_TOKEN_HEADER, DATE_HEADER, DEFAULT_API_VERSION,
    MAX_ITEM_COUNT_HEADER, PARTITION_KEY_HEADER,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Endpoint override; defaults to the credential's database account host
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Service API version header value
    pub api_version: String,
    /// Page size hint applied when a request does not carry one
    pub max_item_count: Option<u32>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            api_version: DEFAULT_API_VERSION.to_string(),
            max_item_count: None,
            default_headers: HashMap::new(),
            user_agent: format!("partdocs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the service API version
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set the default page size hint
    pub fn max_item_count(mut self, count: u32) -> Self {
        self.config.max_item_count = Some(count);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP transport for the document list API
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Build the documents URL of the collection holding a partition
    pub fn documents_url(&self, credential: &TokenResult) -> Result<Url> {
        let base = match &self.config.base_url {
            Some(base) => base.clone(),
            None => format!("https://{}.documents.azure.com", credential.db_account),
        };

        let mut url = Url::parse(&base)?;
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Base URL cannot carry a path: {base}")))?
            .pop_if_empty()
            .extend([
                "dbs",
                credential.db_name.as_str(),
                "colls",
                credential.db_collection_name.as_str(),
                "docs",
            ]);
        Ok(url)
    }

    /// Request headers for one list call
    fn list_headers(&self, request: &ListRequest) -> StringMap {
        let mut headers = self.config.default_headers.clone();
        headers.insert(
            PARTITION_KEY_HEADER.to_string(),
            format!("[\"{}\"]", request.credential.partition),
        );
        headers.insert(API_VERSION_HEADER.to_string(), self.config.api_version.clone());
        headers.insert(DATE_HEADER.to_string(), rfc1123_now());
        headers.insert(
            "authorization".to_string(),
            request.credential.token.clone(),
        );

        if let Some(token) = &request.continuation_token {
            headers.insert(CONTINUATION_TOKEN_HEADER.to_string(), token.clone());
        }
        if let Some(count) = request.max_item_count.or(self.config.max_item_count) {
            headers.insert(MAX_ITEM_COUNT_HEADER.to_string(), count.to_string());
        }
        headers
    }
}

#[async_trait]
impl ListTransport for HttpClient {
    async fn list_documents(&self, request: &ListRequest) -> Result<ListResponse> {
        let url = self.documents_url(&request.credential)?;
        let mut req = self.client.get(url.clone());
        for (key, value) in &self.list_headers(request) {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                });
            }
            Err(e) => return Err(Error::Http(e)),
        };

        let status = response.status();
        let headers: StringMap = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let payload = response.text().await?;

        if !status.is_success() {
            return Err(Error::http_status(status.as_u16(), payload));
        }

        debug!(
            "Listed documents: GET {} ({} bytes, continuation: {})",
            url,
            payload.len(),
            request.continuation_token.is_some()
        );
        Ok(ListResponse {
            status: status.as_u16(),
            payload,
            headers,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Current time in the RFC 1123 form the service expects
fn rfc1123_now() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
