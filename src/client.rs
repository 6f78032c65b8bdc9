//! HTTP client for the Airbyte configuration API.
//!
//! Every call is a single attempt against `<host_url>/api/v1/<path>` with a
//! JSON body and a `Content-Type: application/json` header. A status in
//! `[200, 300)` yields the decoded body; anything else becomes
//! [`ProviderError::Api`] carrying the status and the raw body.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::ProviderError;

/// Path prefix of the configuration API.
pub const API_PREFIX: &str = "api/v1";

/// Host URL used when neither the provider config nor the environment sets one.
pub const DEFAULT_HOST_URL: &str = "http://localhost:8000";

/// Timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Maximum length of a response body written to the log.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Response of the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HealthCheck {
    /// Whether the server reports itself available.
    #[serde(default)]
    pub available: bool,
}

/// Client for the Airbyte configuration API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    host_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a client for `host_url` with the fixed request timeout.
    pub fn new(host_url: impl Into<String>) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("airbyte-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http_client(host_url, http))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(host_url: impl Into<String>, http: Client) -> Self {
        let host_url = host_url.into().trim_end_matches('/').to_string();
        Self { host_url, http }
    }

    /// The host URL this client talks to.
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    /// Full URL for an API path such as `workspaces/get`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.host_url,
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    /// Check that the server is reachable and healthy.
    #[instrument(skip(self), fields(host = %self.host_url))]
    pub async fn health_check(&self) -> Result<HealthCheck, ProviderError> {
        let body = self.send(self.http.get(self.url("health"))).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST `body` to `path` and decode the response.
    #[instrument(skip(self, body))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.post_raw(path, body).await?;
        Ok(serde_json::from_str(&response)?)
    }

    /// POST `body` to `path`, discarding any response body.
    #[instrument(skip(self, body))]
    pub async fn post_no_content<B>(&self, path: &str, body: &B) -> Result<(), ProviderError>
    where
        B: Serialize + ?Sized,
    {
        self.post_raw(path, body).await.map(|_| ())
    }

    async fn post_raw<B>(&self, path: &str, body: &B) -> Result<String, ProviderError>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)?;
        self.send(self.http.post(self.url(path)).body(payload))
            .await
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ProviderError> {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response received");
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                body = %truncate_for_log(&body),
                "API request failed"
            );
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

fn truncate_for_log(body: &str) -> String {
    if body.len() <= MAX_LOG_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_LOG_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
}
