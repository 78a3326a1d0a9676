//! Verb-specific configuration of one transfer on a transport handle.
//!
//! ```text
//! RequestBuilder::new(method, handle)   prepare handle, fail-on-error, follow redirects, verb
//!   .url(url, secure)                   URL and credentials
//!   .unix_socket_path(path)             optional
//!   .post_data(body)                    POST / PUT / PATCH
//!   .append_headers(headers)            collected, sent once per distinct line
//!   .output_file(path)                  truncate now, body goes to the file
//!   .user_agent(ua) .timeout(d)
//!   .execute(flag)                      headers applied, transfer run
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use curl::easy::List;
use curlew_transport::{
    CancellationFlag, TransferStatus, TransportError, TransportHandle, TransportResult,
};

use crate::headers::HeaderSet;
use crate::secure::SecureCommunication;

/// HTTP verb of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether the verb carries a request body.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn setup(what: &'static str) -> impl FnOnce(curl::Error) -> TransportError {
    move |e| TransportError::Setup(format!("failed to set {what}: {}", e.description()))
}

/// Configures a borrowed [`TransportHandle`] for one request and runs it.
///
/// Creating a builder wipes whatever the previous request left on the handle,
/// so a builder dropped halfway through configuration never leaks options
/// into the next one.
pub struct RequestBuilder<'h> {
    handle: &'h mut TransportHandle,
    method: Method,
    headers: BTreeSet<String>,
}

impl<'h> RequestBuilder<'h> {
    pub fn new(method: Method, handle: &'h mut TransportHandle) -> TransportResult<Self> {
        handle.prepare();
        let easy = handle.easy_mut();
        easy.fail_on_error(true).map_err(setup("fail-on-error"))?;
        easy.follow_location(true).map_err(setup("redirect following"))?;
        match method {
            Method::Get => easy.get(true).map_err(setup("GET"))?,
            Method::Post => easy.post(true).map_err(setup("POST"))?,
            Method::Put | Method::Patch | Method::Delete => easy
                .custom_request(method.as_str())
                .map_err(setup("custom request method"))?,
        }

        Ok(Self {
            handle,
            method,
            headers: BTreeSet::new(),
        })
    }

    /// Target URL, plus credentials when given. The URL is not validated
    /// here; libcurl reports malformed URLs when the transfer runs.
    pub fn url(
        &mut self,
        url: &str,
        secure: Option<&SecureCommunication>,
    ) -> TransportResult<&mut Self> {
        let easy = self.handle.easy_mut();
        easy.url(url).map_err(setup("URL"))?;
        if let Some(secure) = secure {
            secure.apply(easy)?;
        }
        Ok(self)
    }

    /// Connect through a UNIX domain socket instead of TCP.
    pub fn unix_socket_path(&mut self, path: &str) -> TransportResult<&mut Self> {
        self.handle
            .easy_mut()
            .unix_socket(path)
            .map_err(setup("UNIX socket path"))?;
        Ok(self)
    }

    pub fn post_data(&mut self, body: &str) -> TransportResult<&mut Self> {
        self.handle
            .easy_mut()
            .post_fields_copy(body.as_bytes())
            .map_err(setup("request body"))?;
        Ok(self)
    }

    pub fn append_header(&mut self, line: &str) -> &mut Self {
        self.headers.insert(line.to_string());
        self
    }

    pub fn append_headers(&mut self, headers: &HeaderSet) -> &mut Self {
        for line in headers.iter() {
            self.append_header(line);
        }
        self
    }

    /// Create or truncate `path` and send the response body there.
    pub fn output_file(&mut self, path: &Path) -> TransportResult<&mut Self> {
        let file = File::create(path)?;
        self.handle.easy_mut().get_mut().attach_file(file);
        Ok(self)
    }

    /// An empty agent keeps libcurl's default.
    pub fn user_agent(&mut self, user_agent: &str) -> TransportResult<&mut Self> {
        if !user_agent.is_empty() {
            self.handle
                .easy_mut()
                .useragent(user_agent)
                .map_err(setup("user agent"))?;
        }
        Ok(self)
    }

    /// Bound the whole transfer.
    pub fn timeout(&mut self, timeout: Duration) -> TransportResult<&mut Self> {
        self.handle
            .easy_mut()
            .timeout(timeout)
            .map_err(setup("timeout"))?;
        Ok(self)
    }

    /// Apply the collected headers and run the transfer.
    pub fn execute(&mut self, flag: &CancellationFlag) -> TransportResult<TransferStatus> {
        if !self.headers.is_empty() {
            let mut list = List::new();
            for line in &self.headers {
                list.append(line).map_err(setup("header"))?;
            }
            self.handle
                .easy_mut()
                .http_headers(list)
                .map_err(setup("headers"))?;
        }

        tracing::debug!(
            verb = %self.method,
            mode = %self.handle.mode(),
            headers = self.headers.len(),
            "executing request"
        );
        self.handle.execute(flag)
    }

    /// Body captured by the transfer. Empty when it went to an output file.
    pub fn response(&self) -> &[u8] {
        self.handle.response()
    }
}

impl fmt::Debug for RequestBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("mode", &self.handle.mode())
            .field("headers", &self.headers)
            .finish()
    }
}
