//! Blocking one-shot transfers.

use curl::easy::Easy2;

use crate::collector::Collector;
use crate::error::{TransportError, TransportResult};
use crate::handle::TransferStatus;

/// One libcurl easy handle driven with a blocking `perform`.
///
/// There is no way to interrupt a blocking transfer: it runs until it
/// finishes or libcurl's own timeout fires.
pub struct SingleHandle {
    easy: Easy2<Collector>,
}

impl std::fmt::Debug for SingleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleHandle")
            .field("buffered", &self.easy.get_ref().body().len())
            .finish()
    }
}

impl SingleHandle {
    pub fn new() -> Self {
        Self {
            easy: Easy2::new(Collector::default()),
        }
    }

    pub fn easy_mut(&mut self) -> &mut Easy2<Collector> {
        &mut self.easy
    }

    pub fn response(&self) -> &[u8] {
        self.easy.get_ref().body()
    }

    /// Perform the configured transfer, then reset the handle's options so
    /// the next request on this thread starts clean. The captured body
    /// survives the reset.
    pub fn execute(&mut self) -> TransportResult<TransferStatus> {
        let outcome = match self.easy.perform() {
            Ok(()) => Ok(TransferStatus::Completed),
            Err(err) => {
                // The response code must be read before the reset wipes it.
                let status = if err.is_http_returned_error() {
                    self.easy.response_code().ok().filter(|code| *code != 0)
                } else {
                    None
                };
                tracing::debug!(
                    code = err.code(),
                    status = ?status,
                    error = %err.description(),
                    "single transfer failed"
                );
                Err(TransportError::transfer(&err, status))
            }
        };

        self.easy.get_mut().close_file();
        self.easy.reset();
        outcome
    }
}

impl Default for SingleHandle {
    fn default() -> Self {
        Self::new()
    }
}
