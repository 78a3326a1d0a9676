//! Per-thread handle cache with oldest-first eviction.
//!
//! libcurl easy handles are expensive to create and must not be driven by two
//! threads at once. The cache hands every thread its own handle per
//! [`HandleMode`] and reuses it across requests, while a fixed capacity caps
//! the number of live native handles in long-running, many-threaded processes.
//!
//! ```text
//! handle(mode)
//!   → lock entries
//!     → (current thread, mode) present → return shared handle
//!     → absent → evict front entry if full → create → push back → return
//! ```
//!
//! Cache statistics (hits, misses, evictions) are emitted as `tracing::debug`
//! events.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::handle::{HandleMode, TransportHandle};
use crate::multi::DEFAULT_WAIT_TIMEOUT;

/// Default maximum number of cached handles across all threads.
pub const DEFAULT_CAPACITY: usize = 5;

/// A handle shared between its cache entry and the call using it.
pub type SharedHandle = Arc<Mutex<TransportHandle>>;

/// Configuration for the handle cache.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Maximum number of entries (default: 5).
    pub capacity: usize,
    /// Wait bound for Multi handles created by this cache (default: 1000ms).
    pub wait_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

struct CacheEntry {
    thread: ThreadId,
    mode: HandleMode,
    handle: SharedHandle,
}

#[derive(Default)]
struct CacheState {
    /// Oldest entry at the front.
    entries: VecDeque<CacheEntry>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Thread-safe, bounded cache of transport handles keyed by (thread, mode).
///
/// At most one entry exists per (thread, mode). When full, a miss evicts the
/// oldest entry no matter which thread owns it; a thread still holding an
/// evicted handle keeps it alive until its call returns.
pub struct HandleCache {
    state: Mutex<CacheState>,
    config: CacheConfig,
}

impl HandleCache {
    /// Create an empty cache. A capacity of zero is raised to one.
    pub fn new(config: CacheConfig) -> Self {
        let config = CacheConfig {
            capacity: config.capacity.max(1),
            ..config
        };
        Self {
            state: Mutex::new(CacheState::default()),
            config,
        }
    }

    /// Return the calling thread's handle for `mode`, creating it on a miss.
    pub fn handle(&self, mode: HandleMode) -> SharedHandle {
        let current = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let hit = state
            .entries
            .iter()
            .find(|entry| entry.thread == current && entry.mode == mode)
            .map(|entry| Arc::clone(&entry.handle));

        if let Some(handle) = hit {
            state.hits += 1;
            tracing::debug!(
                %mode,
                entries = state.entries.len(),
                cache_hits = state.hits,
                cache_misses = state.misses,
                cache_evictions = state.evictions,
                "handle cache hit"
            );
            return handle;
        }

        state.misses += 1;
        if state.entries.len() >= self.config.capacity {
            if let Some(evicted) = state.entries.pop_front() {
                state.evictions += 1;
                tracing::debug!(
                    evicted_mode = %evicted.mode,
                    evicted_thread = ?evicted.thread,
                    capacity = self.config.capacity,
                    "evicted oldest handle"
                );
            }
        }

        let handle = Arc::new(Mutex::new(TransportHandle::new(
            mode,
            self.config.wait_timeout,
        )));
        state.entries.push_back(CacheEntry {
            thread: current,
            mode,
            handle: Arc::clone(&handle),
        });

        tracing::debug!(
            %mode,
            entries = state.entries.len(),
            cache_hits = state.hits,
            cache_misses = state.misses,
            cache_evictions = state.evictions,
            "handle cache miss"
        );
        handle
    }

    /// Current number of cached handles.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Cache statistics: `(hits, misses, evictions)`.
    pub fn stats(&self) -> (u64, u64, u64) {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        (state.hits, state.misses, state.evictions)
    }
}

impl Default for HandleCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
