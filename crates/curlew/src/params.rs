//! Per-call parameter bundles: what to send, how to send it, and what to do
//! with the result.
//!
//! ```text
//! RequestParameters        destination, body, credentials, headers
//! ConfigurationParameters  mode, cancellation flag, user agent, timeout, retry
//! PostRequestParameters    on_success, on_error, output file
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use curlew_transport::{CancellationFlag, HandleMode};

use crate::config::ClientConfig;
use crate::destination::Destination;
use crate::headers::HeaderSet;
use crate::retry::RetryPolicy;
use crate::secure::SecureCommunication;

/// Success handler, called with the response body.
pub type OnSuccess<'a> = Box<dyn FnOnce(&str) + 'a>;

/// Error handler, called with the error message and the HTTP status, native
/// result code or [`NOT_USED`](curlew_transport::NOT_USED).
pub type OnError<'a> = Box<dyn FnOnce(&str, i64) + 'a>;

/// Request payload for POST, PUT and PATCH.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    /// Sent as-is.
    Text(String),
    /// Serialized with `serde_json` before sending.
    Json(serde_json::Value),
}

impl Body {
    /// The bytes to send, or `None` for an empty body.
    pub fn to_payload(&self) -> Option<String> {
        match self {
            Body::Empty => None,
            Body::Text(text) => Some(text.clone()),
            Body::Json(value) => Some(value.to_string()),
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

/// What to request.
#[derive(Clone, Debug)]
pub struct RequestParameters<'a> {
    pub destination: Destination,
    pub body: Body,
    pub secure: Option<&'a SecureCommunication>,
    pub headers: HeaderSet,
}

impl<'a> RequestParameters<'a> {
    /// A request to `destination` with no body, no credentials and the
    /// default JSON headers.
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            body: Body::Empty,
            secure: None,
            headers: HeaderSet::default(),
        }
    }

    pub fn with_body(self, body: impl Into<Body>) -> Self {
        Self {
            body: body.into(),
            ..self
        }
    }

    pub fn with_secure(self, secure: &'a SecureCommunication) -> Self {
        Self {
            secure: Some(secure),
            ..self
        }
    }

    /// Replace the default headers.
    pub fn with_headers(self, headers: HeaderSet) -> Self {
        Self { headers, ..self }
    }
}

/// How to run the request.
#[derive(Clone, Debug, Default)]
pub struct ConfigurationParameters {
    pub mode: HandleMode,
    /// Only observed in [`HandleMode::Multi`].
    pub cancellation: CancellationFlag,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl ConfigurationParameters {
    /// Defaults taken from a client configuration file.
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        Ok(Self {
            mode: config.mode()?,
            cancellation: CancellationFlag::new(),
            user_agent: config.user_agent().map(str::to_string),
            timeout: config.timeout(),
            retry: config.retry_policy(),
        })
    }

    pub fn with_mode(self, mode: HandleMode) -> Self {
        Self { mode, ..self }
    }

    /// Share `flag` with this request; clearing it aborts a Multi transfer.
    pub fn with_cancellation(self, flag: &CancellationFlag) -> Self {
        Self {
            cancellation: flag.clone(),
            ..self
        }
    }

    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    pub fn with_retry(self, retry: RetryPolicy) -> Self {
        Self { retry, ..self }
    }
}

/// What to do once the transfer finishes. Absent handlers are skipped.
#[derive(Default)]
pub struct PostRequestParameters<'a> {
    pub on_success: Option<OnSuccess<'a>>,
    pub on_error: Option<OnError<'a>>,
    pub output_file: Option<PathBuf>,
}

impl<'a> PostRequestParameters<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_success(self, f: impl FnOnce(&str) + 'a) -> Self {
        Self {
            on_success: Some(Box::new(f)),
            ..self
        }
    }

    pub fn with_on_error(self, f: impl FnOnce(&str, i64) + 'a) -> Self {
        Self {
            on_error: Some(Box::new(f)),
            ..self
        }
    }

    /// Write the response body to `path` instead of keeping it in memory.
    /// An empty path means no file.
    pub fn with_output_file(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            output_file: (!path.as_os_str().is_empty()).then(|| path.to_path_buf()),
            ..self
        }
    }

    pub(crate) fn succeed(&mut self, body: &str) {
        if let Some(on_success) = self.on_success.take() {
            on_success(body);
        }
    }

    pub(crate) fn fail(&mut self, message: &str, code: i64) {
        if let Some(on_error) = self.on_error.take() {
            on_error(message, code);
        }
    }
}

impl fmt::Debug for PostRequestParameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostRequestParameters")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("output_file", &self.output_file)
            .finish()
    }
}
