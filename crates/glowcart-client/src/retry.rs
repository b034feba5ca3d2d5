//! Retry with exponential backoff for transient catalog-fetch failures.
//!
//! Only rate limiting (HTTP 429) and network-level failures are retried;
//! 404s, unexpected statuses, and parse failures return the same answer on
//! every attempt and are propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

fn is_transient(err: &ClientError) -> bool {
    matches!(err, ClientError::RateLimited { .. } | ClientError::Http(_))
}

/// Runs `operation`, retrying transient errors up to `max_retries` extra
/// attempts with a delay of `backoff_base_secs * 2^attempt` seconds between
/// tries. The last error is returned once retries are exhausted.
pub(crate) async fn with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_transient(&err) || attempt >= max_retries {
            return Err(err);
        }

        // base * 2^attempt, capped to avoid shift overflow on wild configs.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient catalog fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
