//! Bounded retry with exponential back-off for upstream calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::upstream::UpstreamError;

const MAX_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

/// Network failures, timeouts and 5xx are worth another attempt. A 4xx or an
/// unparseable body will not improve on retry.
pub(crate) fn is_retriable(err: &UpstreamError) -> bool {
    match err {
        UpstreamError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        UpstreamError::Status { status, .. } => *status >= 500,
        UpstreamError::Decode(_) | UpstreamError::InvalidUrl(_) => false,
    }
}

/// Runs `operation` once, then up to `policy.max_retries` more times while it
/// fails with a retriable error. Delay doubles from `backoff_base_ms`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, UpstreamError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = policy
                    .backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(10))
                    .min(MAX_DELAY_MS);
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms,
                    error = %err,
                    "Upstream call failed, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
