//! curlew-transport — libcurl handle lifecycle and cancellable execution.
//!
//! Provides the pieces the request layer drives:
//! - **handle**: [`TransportHandle`], a tagged Single/Multi wrapper over one libcurl easy handle
//! - **single**: blocking one-shot transfers
//! - **multi**: polled transfers that another thread can cancel through a [`CancellationFlag`]
//! - **cache**: [`HandleCache`], one reusable handle per (thread, mode), bounded with oldest-first eviction
//! - **collector**: the write handler capturing response bodies in memory or into a file
//! - **error**: [`TransportError`] and the [`NOT_USED`] status sentinel

pub mod cache;
pub mod cancel;
pub mod collector;
pub mod error;
pub mod handle;
pub mod multi;
pub mod single;

pub use cache::{CacheConfig, HandleCache, SharedHandle};
pub use cancel::CancellationFlag;
pub use collector::Collector;
pub use error::{NOT_USED, TransportError, TransportResult};
pub use handle::{HandleMode, TransferStatus, TransportHandle};

/// Re-exported so callers can set options on [`TransportHandle::easy_mut`]
/// without depending on `curl` directly.
pub use curl::easy::Easy2;
