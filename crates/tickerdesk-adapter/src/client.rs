/*
[INPUT]:  HTTP configuration (base URL, timeouts, credentials) + per-call cancellation token
[OUTPUT]: Configured reqwest client with a cancellation-aware send helper
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing send/cancellation behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Default base URL for a locally running dashboard backend
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8420";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Credentials for authenticated requests
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_token: String,
}

/// HTTP client for the dashboard backend API
#[derive(Debug)]
pub struct DashboardClient {
    http_client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl DashboardClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(&config.base_url)?,
            credentials: None,
        })
    }

    /// Set credentials for authenticated requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Build full URL for an endpoint
    fn url(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(endpoint)
    }

    /// Build request builder for an endpoint, attaching credentials when set
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        let mut builder = self.http_client.request(method, url);
        if let Some(credentials) = &self.credentials {
            builder = builder.bearer_auth(&credentials.api_token);
        }
        Ok(builder)
    }

    /// Send a request and deserialize the JSON response, racing the whole
    /// round trip against the invocation's cancellation token.
    ///
    /// A cancelled token maps to [`ClientError::Cancelled`]; a non-2xx
    /// response maps to [`ClientError::Api`] with the response body as the
    /// message.
    pub(crate) async fn send_json<R: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        token: &CancellationToken,
    ) -> Result<R> {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("request cancelled before completion");
                Err(ClientError::Cancelled)
            }
            response = builder.send() => {
                let response = response?;
                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(ClientError::api_error(status, message));
                }
                Ok(response.json::<R>().await?)
            }
        }
    }
}
