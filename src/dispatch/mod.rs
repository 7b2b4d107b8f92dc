//! Bulk submission dispatch
//!
//! This module contains:
//! - The worker pool that drains a queue of submission tokens
//! - Per-attempt classification and retry backoff
//! - Shared run counters and progress observation

mod dispatcher;
mod observer;
mod retry;
mod stats;

pub use dispatcher::{DispatchConfig, Dispatcher};
pub use observer::{LogProgress, Outcome, ProgressObserver};
pub use retry::{RetryPolicy, SubmitError};
pub use stats::{RunStats, StatsRecorder};
