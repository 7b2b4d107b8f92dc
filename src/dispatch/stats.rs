//! Run statistics
//!
//! Workers mutate a shared `RunStats` through a `StatsRecorder`; the caller
//! holds another handle and takes snapshots for progress and the summary.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Counters for one dispatcher run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Submissions accepted with HTTP 200
    pub success: u64,

    /// Submissions that ended in a terminal failure
    pub failed: u64,

    /// Retry attempts across all submissions (not terminal)
    pub retries: u64,

    /// Failure reason → occurrences
    pub reasons: BTreeMap<String, u64>,
}

impl RunStats {
    /// Submissions that reached a terminal state
    pub fn completed(&self) -> u64 {
        self.success + self.failed
    }

    /// Share of completed submissions that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        let completed = self.completed();
        if completed == 0 {
            0.0
        } else {
            (self.success as f64 / completed as f64) * 100.0
        }
    }
}

/// Cloneable handle to the shared counters of a run
#[derive(Debug, Clone, Default)]
pub struct StatsRecorder {
    inner: Arc<Mutex<RunStats>>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_retry(&self) {
        self.lock().retries += 1;
    }

    pub fn record_success(&self) {
        self.lock().success += 1;
    }

    /// Counts a terminal failure and its reason in one step
    pub fn record_failure(&self, reason: impl Into<String>) {
        let mut stats = self.lock();
        stats.failed += 1;
        *stats.reasons.entry(reason.into()).or_insert(0) += 1;
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> RunStats {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, RunStats> {
        // Updates are single statements, so a poisoned lock still holds consistent counters
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
