//! Request destinations: plain URLs, or a UNIX socket plus URL.

/// Where a request goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// A URL reached over TCP.
    Http { url: String },
    /// A URL whose connection is made through a UNIX domain socket. The
    /// host part of `url` is only used for the `Host` header.
    UnixSocket { socket_path: String, url: String },
}

impl Destination {
    pub fn http(url: impl Into<String>) -> Self {
        Destination::Http { url: url.into() }
    }

    pub fn unix_socket(socket_path: impl Into<String>, url: impl Into<String>) -> Self {
        Destination::UnixSocket {
            socket_path: socket_path.into(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Destination::Http { url } | Destination::UnixSocket { url, .. } => url,
        }
    }

    /// The socket path, for UNIX socket destinations.
    pub fn socket_path(&self) -> Option<&str> {
        match self {
            Destination::Http { .. } => None,
            Destination::UnixSocket { socket_path, .. } => Some(socket_path),
        }
    }
}
