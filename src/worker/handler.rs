//! Fetch worker: executes page requests and decodes the replies.
//!
//! The worker turns a [`FetchRequest`] into a search URL, performs exactly one
//! GET through its [`Transport`], and converts the outcome into a
//! [`WorkerResponse`]. Every failure, whether connection, non-2xx status, or a
//! body that is not JSON, becomes [`WorkerResponse::FetchFailed`]. Nothing is
//! retried.

use crate::domain::error::{GifseekError, Result};
use crate::domain::ResultBatch;
use crate::worker::transport::{HttpTransport, Transport};
use crate::worker::{FetchRequest, WorkerResponse};
use crate::Config;
use tracing::Instrument;
use url::Url;

/// Executes search requests for the session controller.
#[derive(Debug)]
pub struct SearchWorker<T> {
    transport: T,
    endpoint: Url,
    extra_params: Vec<(String, String)>,
}

impl SearchWorker<HttpTransport> {
    /// Creates a worker backed by the `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_transport(HttpTransport::new(config)?, config)
    }
}

impl<T: Transport> SearchWorker<T> {
    /// Creates a worker over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Returns [`GifseekError::Config`] if `config.endpoint` does not parse.
    pub fn with_transport(transport: T, config: &Config) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| GifseekError::Config(format!("invalid endpoint {:?}: {e}", config.endpoint)))?;

        Ok(Self {
            transport,
            endpoint,
            extra_params: config
                .extra_params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the search URL for `request`.
    ///
    /// Core parameters come first, then configured pass-through filters in
    /// key order. Filter values are not validated.
    #[must_use]
    pub fn build_url(&self, request: &FetchRequest) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("api_key", &request.api_key)
                .append_pair("q", &request.query)
                .append_pair("limit", &request.limit.to_string())
                .append_pair("offset", &request.offset.to_string());
            for (key, value) in &self.extra_params {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Performs the request and returns the response event payload.
    pub async fn handle_message(&self, request: FetchRequest) -> WorkerResponse {
        let span = tracing::debug_span!(
            "worker_fetch",
            generation = request.generation,
            offset = request.offset,
            append = request.append
        );

        let generation = request.generation;
        let append = request.append;

        let outcome = self.fetch(&request).instrument(span.clone()).await;
        let _guard = span.enter();

        match outcome {
            Ok(batch) => {
                tracing::debug!(
                    items = batch.items.len(),
                    count = batch.meta.count_returned,
                    total = ?batch.meta.total_count,
                    "page fetched"
                );
                WorkerResponse::PageFetched {
                    generation,
                    append,
                    batch,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "page fetch failed");
                WorkerResponse::FetchFailed {
                    generation,
                    append,
                    message: e.to_string(),
                }
            }
        }
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<ResultBatch> {
        let url = self.build_url(request);
        let reply = self.transport.get(&url).await?;

        if !reply.is_success() {
            return Err(GifseekError::Transport(format!("HTTP {}", reply.status)));
        }

        ResultBatch::from_body(&reply.body)
    }
}
