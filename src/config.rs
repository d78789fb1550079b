//! Client configuration
//!
//! Settings for the document client, loaded from a YAML or JSON file.
//! Every field has a default, so an empty file is a valid configuration.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::DEFAULT_API_VERSION;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Largest page size the service accepts
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Document client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Endpoint override (e.g. a local emulator); defaults to the account host
    #[serde(default)]
    pub base_url: Option<String>,

    /// Service API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Page size hint sent with every list call
    #[serde(default)]
    pub max_item_count: Option<u32>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub default_headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_version: default_api_version(),
            timeout_seconds: default_timeout(),
            max_item_count: None,
            user_agent: None,
            default_headers: HashMap::new(),
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ClientConfig {
    /// Parse a YAML configuration (JSON is accepted too)
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "timeout_seconds",
                "must be greater than zero",
            ));
        }

        if let Some(count) = self.max_item_count {
            if count == 0 || count > MAX_PAGE_SIZE {
                return Err(Error::invalid_value(
                    "max_item_count",
                    format!("must be between 1 and {MAX_PAGE_SIZE}, got {count}"),
                ));
            }
        }

        if self.api_version.is_empty() {
            return Err(Error::invalid_value("api_version", "cannot be empty"));
        }

        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url)
                .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        }

        Ok(())
    }

    /// HTTP transport settings derived from this configuration
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .api_version(self.api_version.clone());

        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(count) = self.max_item_count {
            builder = builder.max_item_count(count);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }
        builder.build()
    }
}

/// Load a configuration file; `.json` files are read as JSON, anything else
/// as YAML
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        ClientConfig::from_json_str(&content)
    } else {
        ClientConfig::from_yaml_str(&content)
    }
}
