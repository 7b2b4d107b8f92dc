//! Per-attempt classification and backoff
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 200 | Success |
//! | HTTP 408, 429, 500, 502, 503 | Retry after `min(2^attempt, 60)` units + jitter |
//! | Any other status (400, 403, 404, ...) | Immediate failure |
//! | Timeout / connection error | Retry after `1 + attempt` units |
//!
//! Retries stop after `max_retries`; the submission is then recorded failed.

use rand::Rng;
use std::time::Duration;
use thiserror::Error;

/// Statuses worth retrying: request timeout, rate limit and transient server errors
const RETRYABLE_STATUSES: [u16; 5] = [408, 429, 500, 502, 503];

/// Why a single submission attempt did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("status {0}")]
    Status(u16),

    #[error("{0}")]
    Network(String),
}

impl SubmitError {
    /// Returns true if another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(code) => RETRYABLE_STATUSES.contains(code),
            Self::Network(_) => true,
        }
    }

    /// Failure reason once the retry budget is spent
    pub fn exhausted_reason(&self) -> String {
        match self {
            Self::Status(code) => format!("status {} (max retries)", code),
            Self::Network(description) => description.clone(),
        }
    }
}

/// Retry budget and backoff timing
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed per submission
    pub max_retries: u32,

    /// Length of one backoff step
    pub unit: Duration,

    /// Cap on the status backoff, in units
    pub cap_units: u32,

    /// Upper bound (exclusive) of the jitter added to status backoff
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 20,
            unit: Duration::from_secs(1),
            cap_units: 60,
            max_jitter: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Policy with the default timing and the given retry budget
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Status backoff before jitter: `min(2^attempt, cap)` units
    pub fn status_backoff(&self, attempt: u32) -> Duration {
        let units = 1u32
            .checked_shl(attempt)
            .unwrap_or(u32::MAX)
            .min(self.cap_units);
        self.unit * units
    }

    /// Network backoff: `1 + attempt` units
    pub fn network_backoff(&self, attempt: u32) -> Duration {
        self.unit * attempt.saturating_add(1)
    }

    /// Wait before retrying after `error` on the zero-based `attempt`
    pub fn delay_for<R: Rng + ?Sized>(&self, error: &SubmitError, attempt: u32, rng: &mut R) -> Duration {
        match error {
            SubmitError::Status(_) => self.status_backoff(attempt) + self.jitter(rng),
            SubmitError::Network(_) => self.network_backoff(attempt),
        }
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_jitter.is_zero() {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(rng.gen_range(0.0..self.max_jitter.as_secs_f64()))
    }
}
