//! The client: handle cache ownership and the retrying transfer loop.
//!
//! ```text
//! send(method, request, output_file, config)
//!   → cache.handle(mode)            per-thread handle, created on a miss
//!   → lock handle
//!   → loop
//!       configure builder → execute
//!       transient failure, retries left, flag set → sleep(base * 2^n) → again
//!   → Response { status, body } | TransportError
//! ```

use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError};
use std::thread;

use curlew_transport::{
    CacheConfig, HandleCache, TransferStatus, TransportHandle, TransportResult,
};

use crate::config::ClientConfig;
use crate::params::{ConfigurationParameters, RequestParameters};
use crate::request::{Method, RequestBuilder};

/// Result of a transfer that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: TransferStatus,
    /// Body bytes exactly as received; empty when they were written to an
    /// output file.
    pub body: Vec<u8>,
}

impl Response {
    /// The body as UTF-8, or `None` when the server sent other bytes.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Entry point for requests. Cloning shares the handle cache.
#[derive(Clone)]
pub struct Client {
    cache: Arc<HandleCache>,
}

impl Client {
    /// A client with the default cache (5 handles, 1000ms multi wait).
    pub fn new() -> Self {
        Self::with_cache_config(CacheConfig::default())
    }

    pub fn with_cache_config(config: CacheConfig) -> Self {
        Self {
            cache: Arc::new(HandleCache::new(config)),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_cache_config(config.cache_config())
    }

    pub fn cache(&self) -> &HandleCache {
        &self.cache
    }

    /// Run one request on the calling thread's cached handle, retrying
    /// transient failures according to `config.retry`.
    pub fn send(
        &self,
        method: Method,
        request: &RequestParameters<'_>,
        output_file: Option<&Path>,
        config: &ConfigurationParameters,
    ) -> TransportResult<Response> {
        let shared = self.cache.handle(config.mode);
        let mut handle = shared.lock().unwrap_or_else(PoisonError::into_inner);
        let url = request.destination.url();

        let mut retry_count = 0;
        loop {
            match attempt(&mut handle, method, request, output_file, config) {
                Ok(status) => {
                    if status == TransferStatus::Cancelled {
                        tracing::info!(verb = %method, url, "transfer cancelled");
                    }
                    return Ok(Response {
                        status,
                        body: handle.response().to_vec(),
                    });
                }
                Err(err)
                    if config.retry.should_retry(retry_count, &err)
                        && config.cancellation.should_run() =>
                {
                    let delay = config.retry.delay(retry_count);
                    retry_count += 1;
                    tracing::warn!(
                        verb = %method,
                        url,
                        attempt = retry_count,
                        max_retries = config.retry.max_retries,
                        delay = ?delay,
                        error = %err,
                        "transfer failed, retrying"
                    );
                    thread::sleep(delay);
                }
                Err(err) => {
                    tracing::debug!(
                        verb = %method,
                        url,
                        code = err.status_code(),
                        error = %err,
                        "transfer failed"
                    );
                    return Err(err);
                }
            }
        }
    }
}

/// Configure the handle from scratch and run it once.
fn attempt(
    handle: &mut TransportHandle,
    method: Method,
    request: &RequestParameters<'_>,
    output_file: Option<&Path>,
    config: &ConfigurationParameters,
) -> TransportResult<TransferStatus> {
    let mut builder = RequestBuilder::new(method, handle)?;
    builder.url(request.destination.url(), request.secure)?;
    if let Some(path) = request.destination.socket_path() {
        builder.unix_socket_path(path)?;
    }
    if method.has_body() {
        // An empty body still goes out as post fields, with Content-Length: 0.
        builder.post_data(&request.body.to_payload().unwrap_or_default())?;
    }
    builder.append_headers(&request.headers);
    if let Some(path) = output_file {
        builder.output_file(path)?;
    }
    if let Some(user_agent) = &config.user_agent {
        builder.user_agent(user_agent)?;
    }
    if let Some(timeout) = config.timeout {
        builder.timeout(timeout)?;
    }
    builder.execute(&config.cancellation)
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("cached_handles", &self.cache.len())
            .field("capacity", &self.cache.capacity())
            .field("wait_timeout", &self.cache.config().wait_timeout)
            .finish()
    }
}
