//! Progress observation

use std::sync::atomic::{AtomicU64, Ordering};

/// Terminal result of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Receives one call per submission that reaches a terminal state
///
/// Called from worker tasks after the outcome is recorded; keep it cheap.
pub trait ProgressObserver: Send + Sync {
    fn recorded(&self, outcome: Outcome);
}

impl<F> ProgressObserver for F
where
    F: Fn(Outcome) + Send + Sync,
{
    fn recorded(&self, outcome: Outcome) {
        self(outcome)
    }
}

/// Logs progress through `tracing` every `every` outcomes and at the end
#[derive(Debug)]
pub struct LogProgress {
    total: u64,
    every: u64,
    done: AtomicU64,
    failed: AtomicU64,
}

impl LogProgress {
    pub fn new(total: u64, every: u64) -> Self {
        Self {
            total,
            every: every.max(1),
            done: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Outcomes observed so far
    pub fn done(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }
}

impl ProgressObserver for LogProgress {
    fn recorded(&self, outcome: Outcome) {
        if !outcome.is_success() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;

        if done % self.every == 0 || done == self.total {
            tracing::info!(
                "Progress: {}/{} submissions ({} failed)",
                done,
                self.total,
                self.failed.load(Ordering::Relaxed)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_closure_observer() {
        let seen = Arc::new(AtomicU64::new(0));
        let counter = seen.clone();
        let observer = move |outcome: Outcome| {
            if outcome.is_success() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        };

        observer.recorded(Outcome::Success);
        observer.recorded(Outcome::Failure);
        observer.recorded(Outcome::Success);

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_log_progress_counts() {
        let progress = LogProgress::new(3, 10);
        progress.recorded(Outcome::Success);
        progress.recorded(Outcome::Failure);

        assert_eq!(progress.done(), 2);
        assert_eq!(progress.failed.load(Ordering::Relaxed), 1);
    }
}
