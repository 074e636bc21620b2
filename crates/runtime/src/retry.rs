//! Retry policy for calls across the server boundary.
//!
//! Failed envelopes are classified by message. Retryable failures wait an
//! exponential, jittered backoff before the next attempt; everything else is
//! handed back to the caller untouched. Faults (`Err`) are never retried.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{Result, RuntimeError};
use crate::config::RetryConfig;
use crate::server::ServerResponse;

/// Jitter applied by [`backoff_delay`], as a fraction of the exponential delay.
pub const DEFAULT_JITTER: f64 = 0.2;

const RETRYABLE_MARKERS: [&str; 6] = [
    "timeout",
    "timed out",
    "network",
    "connection",
    "unavailable",
    "server error",
];

/// Whether a failure message describes a transient condition.
pub fn is_retryable(message: &str) -> bool {
    let message = message.to_lowercase();
    RETRYABLE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Backoff before retrying after `attempt` (1-based) failed, with a random
/// jitter of up to ±20 %.
pub fn backoff_delay(attempt: u32, base: Duration, cap: Duration) -> Duration {
    let jitter = rand::thread_rng().gen_range(-DEFAULT_JITTER..=DEFAULT_JITTER);
    backoff_delay_with_jitter(attempt, base, cap, jitter)
}

/// Deterministic form of [`backoff_delay`].
///
/// `jitter` is a signed fraction of the exponential delay, so `0.2` adds
/// 20 % and `-0.2` removes 20 %. The result is `min(base·2^(attempt-1)·(1+jitter), cap)`
/// and never negative.
pub fn backoff_delay_with_jitter(
    attempt: u32,
    base: Duration,
    cap: Duration,
    jitter: f64,
) -> Duration {
    let exponent = attempt.saturating_sub(1).min(30) as i32;
    let exponential = base.as_secs_f64() * 2f64.powi(exponent);
    let jittered = exponential * (1.0 + jitter);

    let secs = if jittered.is_finite() {
        jittered.clamp(0.0, cap.as_secs_f64())
    } else {
        0.0
    };
    Duration::from_secs_f64(secs)
}

/// Runs boundary calls under the configured [`RetryConfig`].
#[derive(Clone, Debug)]
pub struct RetryController {
    config: RetryConfig,
}

impl RetryController {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Calls `call` until it succeeds, fails for a non-retryable reason or the
    /// attempt budget runs out, and returns the last envelope.
    ///
    /// Cancelling `cancel` aborts the current attempt or backoff wait and
    /// yields [`RuntimeError::Cancelled`].
    pub async fn execute_with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        cancel: &CancellationToken,
        mut call: F,
    ) -> Result<ServerResponse<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<ServerResponse<T>>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(RuntimeError::Cancelled);
            }
            attempt += 1;

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RuntimeError::Cancelled),
                response = call() => response?,
            };

            if response.success {
                if attempt > 1 {
                    debug!(target: "runtime::retry", operation, attempt, "Call succeeded after retry");
                }
                return Ok(response);
            }

            let message = response.error_message();
            if !is_retryable(message) {
                warn!(target: "runtime::retry", operation, attempt, error = %message, "Non-retryable failure");
                return Ok(response);
            }
            if attempt >= max_attempts {
                warn!(
                    target: "runtime::retry",
                    operation,
                    attempts = attempt,
                    error = %message,
                    "Retry budget exhausted"
                );
                return Ok(response);
            }

            let delay = self.next_delay(attempt);
            debug!(
                target: "runtime::retry",
                operation,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %message,
                "Retrying after backoff"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RuntimeError::Cancelled),
                _ = sleep(delay) => {}
            }
        }
    }

    fn next_delay(&self, attempt: u32) -> Duration {
        let spread = if self.config.jitter.is_finite() {
            self.config.jitter.abs()
        } else {
            0.0
        };
        let jitter = if spread > 0.0 {
            rand::thread_rng().gen_range(-spread..=spread)
        } else {
            0.0
        };
        backoff_delay_with_jitter(
            attempt,
            self.config.base_delay,
            self.config.max_delay,
            jitter,
        )
    }
}

impl Default for RetryController {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
