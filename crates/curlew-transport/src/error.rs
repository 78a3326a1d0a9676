//! Error types for transfers and handle setup.

use thiserror::Error;

/// Status code reported when no HTTP status applies (connection failures,
/// malformed URLs, local I/O errors).
pub const NOT_USED: i64 = -1;

/// Result type alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised while configuring or executing a transfer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A blocking transfer finished with a libcurl error.
    ///
    /// `status` is the HTTP response code when libcurl failed because of it
    /// (fail-on-error), `None` for connection-level failures.
    #[error("{message}")]
    Transfer {
        message: String,
        status: Option<u32>,
        code: i64,
        transient: bool,
    },

    /// A polled transfer completed with a non-success libcurl result.
    #[error("{message}")]
    Engine {
        message: String,
        code: i64,
        transient: bool,
    },

    /// The multi interface itself failed (add, perform, wait, remove).
    #[error("multi interface error: {0}")]
    Multi(String),

    /// Setting an option or preparing the handle failed.
    #[error("{0}")]
    Setup(String),

    #[error("invalid handle mode: {0}")]
    InvalidMode(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Build the error for a failed blocking transfer.
    pub(crate) fn transfer(err: &curl::Error, status: Option<u32>) -> Self {
        Self::Transfer {
            message: err.description().to_string(),
            status,
            code: i64::from(err.code()),
            transient: is_connection_failure(err),
        }
    }

    /// Build the error for a polled transfer that completed unsuccessfully.
    pub(crate) fn engine(err: &curl::Error) -> Self {
        Self::Engine {
            message: format!("multi transfer failed: {}", err.description()),
            code: i64::from(err.code()),
            transient: is_connection_failure(err),
        }
    }

    pub(crate) fn multi(step: &str, err: &curl::MultiError) -> Self {
        Self::Multi(format!("{step}: {}", err.description()))
    }

    /// The code handed to error callbacks: the HTTP status for blocking
    /// transfers, the native result code for polled ones, [`NOT_USED`] otherwise.
    pub fn status_code(&self) -> i64 {
        match self {
            Self::Transfer { status, .. } => status.map(i64::from).unwrap_or(NOT_USED),
            Self::Engine { code, .. } => *code,
            _ => NOT_USED,
        }
    }

    /// Whether a fresh attempt could plausibly succeed (DNS, connect,
    /// send/recv failures and timeouts). HTTP errors and setup errors never are.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transfer {
                status, transient, ..
            } => status.is_none() && *transient,
            Self::Engine { transient, .. } => *transient,
            _ => false,
        }
    }
}

fn is_connection_failure(err: &curl::Error) -> bool {
    err.is_couldnt_resolve_host()
        || err.is_couldnt_resolve_proxy()
        || err.is_couldnt_connect()
        || err.is_operation_timedout()
        || err.is_send_error()
        || err.is_recv_error()
        || err.is_got_nothing()
}
