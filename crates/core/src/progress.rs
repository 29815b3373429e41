//! Cooperative progress reporting and cancellation for long-running tasks.
//!
//! A `TaskProgress` is a cheap cloneable handle. The task owner keeps one
//! clone to request cancellation, the worker keeps another and polls
//! `is_cancelled()` at its own checkpoints.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct ProgressState {
    cancelled: AtomicBool,
    value: AtomicU8,
}

/// Shared progress/cancellation token.
#[derive(Debug, Clone, Default)]
pub struct TaskProgress {
    state: Arc<ProgressState>,
}

impl TaskProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the worker to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Current progress in percent (0..=100)
    pub fn value(&self) -> u8 {
        self.state.value.load(Ordering::Relaxed)
    }

    /// Set progress in percent, values above 100 are clamped
    pub fn set_value(&self, pct: u8) {
        self.state.value.store(pct.min(100), Ordering::Relaxed);
    }

    /// Set progress from a `done / total` ratio.
    pub fn set_ratio(&self, done: usize, total: usize) {
        if total == 0 {
            self.set_value(100);
            return;
        }
        let pct = (done.min(total) * 100) / total;
        self.set_value(pct as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let owner = TaskProgress::new();
        let worker = owner.clone();
        assert!(!worker.is_cancelled());
        owner.cancel();
        assert!(worker.is_cancelled());
    }

    #[test]
    fn test_value_is_clamped() {
        let progress = TaskProgress::new();
        progress.set_value(250);
        assert_eq!(progress.value(), 100);
    }

    #[test]
    fn test_ratio() {
        let progress = TaskProgress::new();
        progress.set_ratio(1, 4);
        assert_eq!(progress.value(), 25);
        progress.set_ratio(0, 0);
        assert_eq!(progress.value(), 100);
    }
}
