//! Provider configuration.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::DEFAULT_HOST_URL;
use crate::error::ProviderError;
use crate::optional::Optional;
use crate::schema::{Attribute, Schema};

/// Environment variable consulted when `host_url` is not configured.
pub const HOST_URL_ENV: &str = "AIRBYTE_URL";

/// Provider block settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the Airbyte server.
    pub host_url: Optional<String>,
}

impl ProviderConfig {
    /// Decode the host's provider configuration bag. `null` means no settings.
    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|e| ProviderError::Configuration(format!("invalid provider configuration: {}", e)))
    }

    /// Resolve the host URL from config, then the environment, then the default.
    pub fn resolve_host_url(&self) -> Result<String, ProviderError> {
        self.resolve_host_url_with(std::env::var(HOST_URL_ENV).ok())
    }

    fn resolve_host_url_with(&self, env_value: Option<String>) -> Result<String, ProviderError> {
        let host_url = self
            .host_url
            .as_present()
            .filter(|url| !url.is_empty())
            .cloned()
            .or_else(|| env_value.filter(|url| !url.is_empty()))
            .unwrap_or_else(|| DEFAULT_HOST_URL.to_string());
        check_host_url(&host_url)?;
        Ok(host_url)
    }
}

/// An absolute `http` or `https` URL.
pub fn check_host_url(host_url: &str) -> Result<(), ProviderError> {
    let url = Url::parse(host_url)
        .map_err(|e| ProviderError::Configuration(format!("invalid host_url \"{}\": {}", host_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ProviderError::Configuration(format!(
            "invalid host_url \"{}\": unsupported scheme \"{}\"",
            host_url, scheme
        ))),
    }
}

/// Schema of the provider block.
pub fn schema() -> Schema {
    Schema::v0().with_attribute(
        "host_url",
        Attribute::optional_string().with_description(format!(
            "Airbyte server URL. Falls back to the {} environment variable, then {}",
            HOST_URL_ENV, DEFAULT_HOST_URL
        )),
    )
}
