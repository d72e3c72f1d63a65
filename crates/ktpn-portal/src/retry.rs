//! Linear-backoff retry around a whole lookup.
//!
//! CAPTCHA OCR is probabilistic, so individual attempts fail routinely.
//! Every error is treated as retryable; after attempt `n` fails the wrapper
//! waits `n` seconds before the next one.

use std::future::Future;
use std::time::Duration;

/// Base unit of the linear backoff.
const BACKOFF_STEP: Duration = Duration::from_secs(1);

/// Backoff before the attempt following failed attempt number `attempt` (1-based).
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_STEP * attempt
}

/// Run `operation` until it succeeds or `max_attempts` calls have failed.
///
/// The operation is always invoked at least once, even when `max_attempts`
/// is zero. On exhaustion the last error is returned unchanged.
pub async fn retry<T, E, F, Fut>(max_attempts: u32, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= max_attempts {
                    tracing::warn!(
                        "Attempt {}/{} failed: {}, giving up",
                        attempt,
                        max_attempts,
                        e
                    );
                    return Err(e);
                }

                let delay = backoff_delay(attempt);
                tracing::warn!(
                    "Attempt {}/{} failed: {}, retrying in {:?}...",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
