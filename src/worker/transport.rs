//! HTTP transport seam for the fetch worker.
//!
//! [`Transport`] performs one GET and hands back the status and body. It does
//! not retry. [`HttpTransport`] is the production implementation backed by a
//! shared [`reqwest::Client`].

use crate::domain::error::{GifseekError, Result};
use crate::Config;
use std::time::Duration;
use url::Url;

/// Raw HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// A single-attempt GET transport.
///
/// Implementations must be `Send + Sync` so the worker can be shared across
/// tasks.
pub trait Transport: Send + Sync {
    /// Issues a GET for `url`.
    ///
    /// Non-2xx statuses are returned as an `Ok` reply; only failures to obtain
    /// a reply at all are errors.
    ///
    /// # Errors
    ///
    /// Returns [`GifseekError::Transport`] if the connection fails or the body
    /// cannot be read.
    fn get(&self, url: &Url) -> impl std::future::Future<Output = Result<HttpReply>> + Send;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GifseekError::Transport`] if the client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder
            .build()
            .map_err(|e| GifseekError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<HttpReply> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            // Strip the URL from the error: it carries the API key.
            .map_err(|e| GifseekError::Transport(format!("request failed: {}", e.without_url())))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GifseekError::Transport(format!("response read failed: {}", e.without_url())))?;

        tracing::trace!(status, bytes = body.len(), "search response received");

        Ok(HttpReply { status, body })
    }
}
