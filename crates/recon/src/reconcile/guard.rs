//! Single-run exclusion and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ReconError, Result};

/// Shared flag checked by the row scan before each row.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread, including signal handlers.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Holds the run slot of a [`Reconciler`](super::Reconciler) until dropped.
#[derive(Debug)]
pub(crate) struct RunGuard {
    running: Arc<AtomicBool>,
}

impl RunGuard {
    /// Claim the slot, or fail with `RunInProgress` if it is taken.
    pub(crate) fn acquire(running: &Arc<AtomicBool>) -> Result<Self> {
        running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ReconError::RunInProgress)?;
        Ok(Self {
            running: Arc::clone(running),
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let running = Arc::new(AtomicBool::new(false));

        let guard = RunGuard::acquire(&running).unwrap();
        assert!(matches!(
            RunGuard::acquire(&running),
            Err(ReconError::RunInProgress)
        ));

        drop(guard);
        assert!(RunGuard::acquire(&running).is_ok());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
