//! SpaceVoice REST API Client
//!
//! HTTP plumbing shared by every endpoint group: URL building, bearer
//! header injection, and error normalization.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use crate::session::TokenStore;

/// Path prefix of every backend endpoint
pub const API_PREFIX: &str = "/api/v1";

/// SpaceVoice backend client
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
}

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin (e.g., "https://api.spacevoice.ai")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Timeout for outbound call requests in milliseconds
    pub telephony_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.spacevoice.ai".to_string(),
            request_timeout_ms: 30_000,
            telephony_timeout_ms: 15_000,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl ApiClient {
    /// Create a client reading its bearer token from `tokens` on every call
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(ClientError::from_transport)?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.config.base_url.trim_end_matches('/'),
            API_PREFIX,
            path
        )
    }

    /// Request with the stored bearer token attached, if there is one
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.tokens.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Request authenticated with an explicit token
    pub(crate) fn request_with_token(
        &self,
        method: Method,
        path: &str,
        token: &str,
    ) -> RequestBuilder {
        self.http.request(method, self.url(path)).bearer_auth(token)
    }

    /// Send and decode a JSON response body
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.execute(builder).await?;
        response.json::<T>().await.map_err(ClientError::from_transport)
    }

    /// Send, discarding any response body
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> ClientResult<()> {
        self.execute(builder).await.map(|_| ())
    }

    async fn execute(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let request = builder.build().map_err(ClientError::from_transport)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::debug!(%method, %path, "Sending API request");

        let response = self.http.execute(request).await.map_err(|e| {
            let err = ClientError::from_transport(e);
            tracing::warn!(%method, %path, error = %err, "API request failed");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "API response");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status.as_u16(), &body);
        tracing::debug!(%method, %path, status = status.as_u16(), detail = %err, "API error response");
        Err(err)
    }
}
