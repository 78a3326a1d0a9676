//! curlew — verb-based HTTP requests over TCP and UNIX domain sockets.
//!
//! Built on [`curlew_transport`]'s cached libcurl handles:
//! - **facade**: [`HttpRequest`] and [`UnixSocketRequest`], the public verb API
//! - **client**: [`Client`], owning the handle cache and driving retries
//! - **request**: [`RequestBuilder`], configuring one transfer on a handle
//! - **params**: the what / how / what-next parameter bundles
//! - **secure**: [`SecureCommunication`] TLS and basic-auth credentials
//! - **headers**: [`HeaderSet`] with the JSON defaults
//! - **retry**: [`RetryPolicy`] for connection-level failures
//! - **config**: [`ClientConfig`] parsing from TOML
//!
//! ```no_run
//! use curlew::{Client, Destination, HttpRequest, PostRequestParameters, RequestParameters};
//! use curlew::{ConfigurationParameters, UrlRequest};
//!
//! let http = HttpRequest::new(Client::new());
//! http.get(
//!     RequestParameters::new(Destination::http("http://localhost:8080/")),
//!     PostRequestParameters::new().with_on_success(|body| println!("{body}")),
//!     ConfigurationParameters::default(),
//! );
//! ```

pub mod client;
pub mod config;
pub mod destination;
pub mod facade;
pub mod headers;
pub mod params;
pub mod request;
pub mod retry;
pub mod secure;

pub use client::{Client, Response};
pub use config::ClientConfig;
pub use destination::Destination;
pub use facade::{HttpRequest, Outcome, UnixSocketRequest, UrlRequest};
pub use headers::HeaderSet;
pub use params::{Body, ConfigurationParameters, PostRequestParameters, RequestParameters};
pub use request::{Method, RequestBuilder};
pub use retry::RetryPolicy;
pub use secure::SecureCommunication;

pub use curlew_transport::{
    CacheConfig, CancellationFlag, HandleCache, HandleMode, NOT_USED, TransferStatus,
    TransportError, TransportResult,
};
