//! Retry policy for outbound source requests.
//!
//! Transient failures (network faults, timeouts, 429, 5xx) are retried
//! with exponential backoff; permanent failures are surfaced immediately.
//! The policy is a plain value handed to each client at construction so
//! tests can tighten or disable it without touching global state.

use std::time::Duration;

/// How a client retries transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// First backoff delay; doubles on every subsequent retry
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    /// No retries, no waiting. For tests and one-shot probes.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        // Cap the shift; a capped delay is already hours long
        let factor = 1u32 << attempt.min(16);
        self.backoff_base.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(2),
        }
    }
}
