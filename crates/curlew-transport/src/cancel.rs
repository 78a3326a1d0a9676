//! Cooperative cancellation for polled transfers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "keep running" signal checked between poll iterations.
///
/// Clones share the same cell. The flag starts set; [`cancel`](Self::cancel)
/// clears it and any multi transfer polling it stops within one wait
/// interval. Blocking (single) transfers ignore it.
#[derive(Clone, Debug)]
pub struct CancellationFlag {
    should_run: Arc<AtomicBool>,
}

impl CancellationFlag {
    /// Create a flag in the running state.
    pub fn new() -> Self {
        Self {
            should_run: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Request that in-flight transfers stop.
    pub fn cancel(&self) {
        self.should_run.store(false, Ordering::SeqCst);
    }

    /// Put the flag back into the running state.
    pub fn reset(&self) {
        self.should_run.store(true, Ordering::SeqCst);
    }

    /// Read the flag. Never cached; every poll iteration calls this.
    pub fn should_run(&self) -> bool {
        self.should_run.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        !self.should_run()
    }
}

impl Default for CancellationFlag {
    fn default() -> Self {
        Self::new()
    }
}
