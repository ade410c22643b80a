//! Failure injection for the in-memory store.
//!
//! Lets tests reproduce what a real backend does under stress: refuse a few
//! calls, die half way through a multi-document commit, or answer slowly.

use crate::domain::errors::StoreError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// Pending faults. All counters are consumed as they fire.
#[derive(Debug, Default)]
pub struct FaultPlan {
    transient_failures: AtomicU32,
    abort_commit_at: Mutex<Option<usize>>,
    latency_micros: AtomicU64,
}

impl FaultPlan {
    /// Fail the next `n` store calls with `Unavailable` before they touch state.
    pub fn fail_next(&self, n: u32) {
        self.transient_failures.store(n, Ordering::SeqCst);
    }

    /// Fail the next commit after `ops_applied` of its ops have been staged.
    pub fn abort_next_commit_at(&self, ops_applied: usize) {
        *self.abort_commit_at.lock() = Some(ops_applied);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_micros
            .store(latency.as_micros() as u64, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.transient_failures.store(0, Ordering::SeqCst);
        *self.abort_commit_at.lock() = None;
        self.latency_micros.store(0, Ordering::SeqCst);
    }

    pub(crate) fn take_transient(&self) -> Result<(), StoreError> {
        let fired = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fired {
            return Err(StoreError::Unavailable("injected transient failure".into()));
        }
        Ok(())
    }

    pub(crate) fn take_commit_abort(&self) -> Option<usize> {
        self.abort_commit_at.lock().take()
    }

    pub(crate) fn latency(&self) -> Option<Duration> {
        match self.latency_micros.load(Ordering::SeqCst) {
            0 => None,
            micros => Some(Duration::from_micros(micros)),
        }
    }
}
