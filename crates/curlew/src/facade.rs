//! Verb facades: the callback-style public API.
//!
//! Every verb takes the three parameter bundles, runs the request through the
//! facade's [`Client`], and reports back through the handlers:
//!
//! ```text
//! completed → on_success(body)            (download: the output file is the result)
//! failed    → on_error(message, code)     code: HTTP status, native code or -1
//!             non-UTF-8 body → on_error("response body is not valid UTF-8", -1)
//! cancelled → no handler
//! ```

use curlew_transport::{NOT_USED, TransferStatus, TransportError, TransportResult};

use crate::client::Client;
use crate::destination::Destination;
use crate::params::{ConfigurationParameters, PostRequestParameters, RequestParameters};
use crate::request::Method;

/// What a verb call ended with. Handlers have already run when this is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    /// The cancellation flag stopped a multi transfer; no handler ran.
    Cancelled,
}

/// Verb API shared by [`HttpRequest`] and [`UnixSocketRequest`].
pub trait UrlRequest {
    fn client(&self) -> &Client;

    /// Check `destination` against the facade's transport and return the one
    /// to use.
    fn route(&self, destination: Destination) -> TransportResult<Destination>;

    fn get(
        &self,
        request: RequestParameters<'_>,
        post: PostRequestParameters<'_>,
        config: ConfigurationParameters,
    ) -> Outcome {
        dispatch(self, Method::Get, true, request, post, config)
    }

    fn post(
        &self,
        request: RequestParameters<'_>,
        post: PostRequestParameters<'_>,
        config: ConfigurationParameters,
    ) -> Outcome {
        dispatch(self, Method::Post, true, request, post, config)
    }

    fn put(
        &self,
        request: RequestParameters<'_>,
        post: PostRequestParameters<'_>,
        config: ConfigurationParameters,
    ) -> Outcome {
        dispatch(self, Method::Put, true, request, post, config)
    }

    fn patch(
        &self,
        request: RequestParameters<'_>,
        post: PostRequestParameters<'_>,
        config: ConfigurationParameters,
    ) -> Outcome {
        dispatch(self, Method::Patch, true, request, post, config)
    }

    fn delete(
        &self,
        request: RequestParameters<'_>,
        post: PostRequestParameters<'_>,
        config: ConfigurationParameters,
    ) -> Outcome {
        dispatch(self, Method::Delete, true, request, post, config)
    }

    /// GET into `post.output_file`. Only `on_error` is ever called; on
    /// failure the file is left empty.
    fn download(
        &self,
        request: RequestParameters<'_>,
        post: PostRequestParameters<'_>,
        config: ConfigurationParameters,
    ) -> Outcome {
        dispatch(self, Method::Get, false, request, post, config)
    }
}

fn dispatch<F: UrlRequest + ?Sized>(
    facade: &F,
    method: Method,
    notify_success: bool,
    mut request: RequestParameters<'_>,
    mut post: PostRequestParameters<'_>,
    config: ConfigurationParameters,
) -> Outcome {
    let result = match facade.route(request.destination) {
        Ok(destination) => {
            request.destination = destination;
            facade
                .client()
                .send(method, &request, post.output_file.as_deref(), &config)
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(response) if response.status == TransferStatus::Cancelled => Outcome::Cancelled,
        Ok(_) if !notify_success => Outcome::Succeeded,
        Ok(response) => match response.text() {
            Some(body) => {
                post.succeed(body);
                Outcome::Succeeded
            }
            None => {
                tracing::debug!(
                    verb = %method,
                    bytes = response.body.len(),
                    "non-UTF-8 response body"
                );
                post.fail("response body is not valid UTF-8", NOT_USED);
                Outcome::Failed
            }
        },
        Err(err) => {
            post.fail(&err.to_string(), err.status_code());
            Outcome::Failed
        }
    }
}

/// Requests to URLs over TCP.
#[derive(Clone, Debug, Default)]
pub struct HttpRequest {
    client: Client,
}

impl HttpRequest {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl UrlRequest for HttpRequest {
    fn client(&self) -> &Client {
        &self.client
    }

    /// Any socket path is dropped; only the URL is used.
    fn route(&self, destination: Destination) -> TransportResult<Destination> {
        Ok(match destination {
            Destination::UnixSocket { url, .. } => Destination::Http { url },
            http => http,
        })
    }
}

/// Requests sent through a UNIX domain socket.
#[derive(Clone, Debug, Default)]
pub struct UnixSocketRequest {
    client: Client,
}

impl UnixSocketRequest {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl UrlRequest for UnixSocketRequest {
    fn client(&self) -> &Client {
        &self.client
    }

    fn route(&self, destination: Destination) -> TransportResult<Destination> {
        match destination {
            Destination::UnixSocket { .. } => Ok(destination),
            Destination::Http { url } => Err(TransportError::Setup(format!(
                "UNIX socket path required for {url}"
            ))),
        }
    }
}
