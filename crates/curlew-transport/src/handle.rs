//! Transport handles: the Single/Multi variants behind one type.

use std::str::FromStr;
use std::time::Duration;

use curl::easy::Easy2;

use crate::cancel::CancellationFlag;
use crate::collector::Collector;
use crate::error::{TransportError, TransportResult};
use crate::multi::MultiHandle;
use crate::single::SingleHandle;

/// Execution strategy for a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum HandleMode {
    /// Blocking one-shot transfer (default).
    #[default]
    Single,
    /// Polled transfer that honours a [`CancellationFlag`].
    Multi,
}

impl std::fmt::Display for HandleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandleMode::Single => write!(f, "single"),
            HandleMode::Multi => write!(f, "multi"),
        }
    }
}

impl FromStr for HandleMode {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(HandleMode::Single),
            "multi" => Ok(HandleMode::Multi),
            other => Err(TransportError::InvalidMode(other.to_string())),
        }
    }
}

/// How a transfer ended when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    /// libcurl reported the transfer done.
    Completed,
    /// The cancellation flag was cleared before the transfer finished.
    Cancelled,
}

/// A reusable libcurl handle tagged with its execution mode.
///
/// The mode is fixed at construction. Options are set through
/// [`easy_mut`](Self::easy_mut) and wiped after every [`execute`](Self::execute).
#[derive(Debug)]
pub enum TransportHandle {
    Single(SingleHandle),
    Multi(MultiHandle),
}

impl TransportHandle {
    /// Construct a handle for `mode`. `wait_timeout` only applies to Multi.
    pub fn new(mode: HandleMode, wait_timeout: Duration) -> Self {
        match mode {
            HandleMode::Single => TransportHandle::Single(SingleHandle::new()),
            HandleMode::Multi => TransportHandle::Multi(MultiHandle::new(wait_timeout)),
        }
    }

    pub fn mode(&self) -> HandleMode {
        match self {
            TransportHandle::Single(_) => HandleMode::Single,
            TransportHandle::Multi(_) => HandleMode::Multi,
        }
    }

    /// The underlying easy handle, for setting options before `execute`.
    pub fn easy_mut(&mut self) -> &mut Easy2<Collector> {
        match self {
            TransportHandle::Single(h) => h.easy_mut(),
            TransportHandle::Multi(h) => h.easy_mut(),
        }
    }

    /// Body captured by the last transfer. Valid until the next [`prepare`](Self::prepare).
    pub fn response(&self) -> &[u8] {
        match self {
            TransportHandle::Single(h) => h.response(),
            TransportHandle::Multi(h) => h.response(),
        }
    }

    /// Start a new request: wipe options left by an aborted configuration,
    /// drop the previous response and any output file.
    pub fn prepare(&mut self) {
        let easy = self.easy_mut();
        easy.reset();
        easy.get_mut().clear();
    }

    /// Run the configured transfer. Single handles ignore `flag`.
    pub fn execute(&mut self, flag: &CancellationFlag) -> TransportResult<TransferStatus> {
        match self {
            TransportHandle::Single(h) => h.execute(),
            TransportHandle::Multi(h) => h.execute(flag),
        }
    }
}
