//! Polled transfers that can be cancelled from another thread.
//!
//! The easy handle is registered with a libcurl multi handle and driven in a
//! loop of non-blocking `perform` steps separated by a bounded `wait`. The
//! [`CancellationFlag`] is read after every wait, so a cancel request is
//! observed within one wait interval without killing the driving thread.
//!
//! ```text
//! execute(flag)
//!   → add easy handle to multi
//!     → loop { perform; wait(≤ wait_timeout) } while running && flag.should_run()
//!   → drain completion messages (failure → TransportError::Engine)
//!   → remove easy handle, reset its options   (every exit path)
//! ```

use std::time::Duration;

use curl::easy::Easy2;
use curl::multi::{Easy2Handle, Multi, WaitFd};

use crate::cancel::CancellationFlag;
use crate::collector::Collector;
use crate::error::{TransportError, TransportResult};
use crate::handle::TransferStatus;

/// Default upper bound for a single `wait` call.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(1000);

/// One easy handle paired with its own multi handle.
pub struct MultiHandle {
    multi: Multi,
    /// The easy handle while it is detached from `multi`. `None` only if a
    /// previous removal failed; a fresh handle is created on next use.
    easy: Option<Easy2<Collector>>,
    wait_timeout: Duration,
}

impl std::fmt::Debug for MultiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiHandle")
            .field("wait_timeout", &self.wait_timeout)
            .field("attached", &self.easy.is_none())
            .finish()
    }
}

impl MultiHandle {
    pub fn new(wait_timeout: Duration) -> Self {
        Self {
            multi: Multi::new(),
            easy: Some(Easy2::new(Collector::default())),
            wait_timeout,
        }
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    pub fn easy_mut(&mut self) -> &mut Easy2<Collector> {
        self.easy
            .get_or_insert_with(|| Easy2::new(Collector::default()))
    }

    pub fn response(&self) -> &[u8] {
        self.easy
            .as_ref()
            .map(|easy| easy.get_ref().body())
            .unwrap_or_default()
    }

    /// Drive the configured transfer until it completes or `flag` is cleared.
    ///
    /// Returns [`TransferStatus::Cancelled`] when the loop stopped because of
    /// the flag while the transfer was still running. Cancellation is not an
    /// error.
    pub fn execute(&mut self, flag: &CancellationFlag) -> TransportResult<TransferStatus> {
        let easy = self
            .easy
            .take()
            .unwrap_or_else(|| Easy2::new(Collector::default()));

        // A failed add drops the easy handle; easy_mut() recreates it.
        let attached = self
            .multi
            .add2(easy)
            .map_err(|e| TransportError::multi("add handle", &e))?;

        let outcome = self.drive(&attached, flag);

        match self.multi.remove2(attached) {
            Ok(mut easy) => {
                easy.get_mut().close_file();
                easy.reset();
                self.easy = Some(easy);
                outcome
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to detach easy handle from multi handle");
                // The transfer's own error takes precedence over the detach failure.
                outcome.and(Err(TransportError::multi("remove handle", &e)))
            }
        }
    }

    fn drive(
        &self,
        attached: &Easy2Handle<Collector>,
        flag: &CancellationFlag,
    ) -> TransportResult<TransferStatus> {
        let mut no_extra_fds: [WaitFd; 0] = [];
        let mut running;

        loop {
            running = self
                .multi
                .perform()
                .map_err(|e| TransportError::multi("perform", &e))?;
            if running == 0 {
                break;
            }

            // Returns early on socket activity, otherwise after wait_timeout.
            self.multi
                .wait(&mut no_extra_fds, self.wait_timeout)
                .map_err(|e| TransportError::multi("wait", &e))?;

            if !flag.should_run() {
                tracing::debug!(running, "multi transfer cancelled");
                break;
            }
        }

        let mut failure = None;
        self.multi.messages(|message| {
            if let Some(Err(err)) = message.result_for2(attached) {
                failure = Some(err);
            }
        });

        if let Some(err) = failure {
            tracing::debug!(
                code = err.code(),
                error = %err.description(),
                "multi transfer failed"
            );
            return Err(TransportError::engine(&err));
        }

        if running > 0 {
            Ok(TransferStatus::Cancelled)
        } else {
            Ok(TransferStatus::Completed)
        }
    }
}

impl Default for MultiHandle {
    fn default() -> Self {
        Self::new(DEFAULT_WAIT_TIMEOUT)
    }
}
