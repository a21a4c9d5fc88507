//! Client for the recommendation backend and the fallback combinator every
//! proxying handler goes through.
//!
//! A failed upstream call never reaches the caller: [`or_fallback`] logs the
//! error and substitutes the endpoint's canned payload.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod retry;

pub use retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream body is not valid JSON: {0}")]
    Decode(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// HTTP client for the recommendation backend.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            base_url,
            retry,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            &config.fastapi_base_url,
            Duration::from_secs(config.upstream_timeout_secs),
            RetryPolicy {
                max_retries: config.upstream_max_retries,
                backoff_base_ms: config.upstream_retry_backoff_ms,
            },
        )
    }

    fn url(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| UpstreamError::InvalidUrl(format!("{path}: {e}")))
    }

    /// POSTs `body` as JSON and returns the parsed JSON reply.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value, UpstreamError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        retry::retry_with_backoff(self.retry, || self.send(self.client.post(url.clone()).json(body)))
            .await
    }

    /// Like [`post_json`](Self::post_json), with `timeout` per attempt in
    /// place of the client default.
    pub async fn post_json_with_timeout<B>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Value, UpstreamError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        retry::retry_with_backoff(self.retry, || {
            self.send(self.client.post(url.clone()).timeout(timeout).json(body))
        })
        .await
    }

    /// GETs `path` with the given query pairs and returns the parsed JSON reply.
    pub async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = self.url(path)?;
        retry::retry_with_backoff(self.retry, || self.send(self.client.get(url.clone()).query(query)))
            .await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, UpstreamError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))?;
        debug!("Upstream call succeeded ({} bytes)", bytes.len());
        Ok(value)
    }
}

/// Where a proxied payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Upstream,
    Fallback,
}

/// Returns the upstream payload, or logs the failure and returns the mock.
pub fn or_fallback(
    endpoint: &str,
    result: Result<Value, UpstreamError>,
    mock: impl FnOnce() -> Value,
) -> (Value, Source) {
    match result {
        Ok(value) => (value, Source::Upstream),
        Err(err) => {
            warn!("Upstream {endpoint} unavailable, serving fallback: {err}");
            (mock(), Source::Fallback)
        }
    }
}
