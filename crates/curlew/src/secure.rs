//! TLS and basic-auth credentials for a request.

use curl::easy::Easy2;
use curlew_transport::{Collector, TransportError, TransportResult};

/// Optional credentials applied to a transfer.
///
/// Built once through the `with_*` methods and then only read, so one value
/// can be shared by reference across concurrent requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecureCommunication {
    ca_root_certificate: Option<String>,
    ssl_certificate: Option<String>,
    ssl_key: Option<String>,
    basic_auth: Option<String>,
    skip_peer_verification: bool,
}

impl SecureCommunication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the server against this CA bundle instead of the system store.
    pub fn with_ca_root_certificate(self, path: impl Into<String>) -> Self {
        Self {
            ca_root_certificate: Some(path.into()),
            ..self
        }
    }

    /// Present a client certificate and key (mutual TLS).
    pub fn with_client_auth(self, certificate: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            ssl_certificate: Some(certificate.into()),
            ssl_key: Some(key.into()),
            ..self
        }
    }

    /// Basic-auth credentials as `user:password`.
    pub fn with_basic_auth(self, credentials: impl Into<String>) -> Self {
        Self {
            basic_auth: Some(credentials.into()),
            ..self
        }
    }

    /// Disable peer and host verification.
    pub fn with_skip_peer_verification(self, skip: bool) -> Self {
        Self {
            skip_peer_verification: skip,
            ..self
        }
    }

    pub fn ca_root_certificate(&self) -> Option<&str> {
        self.ca_root_certificate.as_deref()
    }

    pub fn ssl_certificate(&self) -> Option<&str> {
        self.ssl_certificate.as_deref()
    }

    pub fn ssl_key(&self) -> Option<&str> {
        self.ssl_key.as_deref()
    }

    pub fn basic_auth(&self) -> Option<&str> {
        self.basic_auth.as_deref()
    }

    pub fn skip_peer_verification(&self) -> bool {
        self.skip_peer_verification
    }

    /// Set the matching libcurl options on `easy`.
    pub(crate) fn apply(&self, easy: &mut Easy2<Collector>) -> TransportResult<()> {
        let setup = |what: &str, e: curl::Error| {
            TransportError::Setup(format!("failed to set {what}: {}", e.description()))
        };

        if let Some(ca) = &self.ca_root_certificate {
            easy.cainfo(ca).map_err(|e| setup("CA certificate", e))?;
        }
        if let Some(cert) = &self.ssl_certificate {
            easy.ssl_cert(cert).map_err(|e| setup("client certificate", e))?;
        }
        if let Some(key) = &self.ssl_key {
            easy.ssl_key(key).map_err(|e| setup("client key", e))?;
        }
        if let Some(credentials) = &self.basic_auth {
            let (user, password) = split_credentials(credentials);
            easy.username(user).map_err(|e| setup("username", e))?;
            easy.password(password).map_err(|e| setup("password", e))?;
        }
        if self.skip_peer_verification {
            easy.ssl_verify_peer(false)
                .map_err(|e| setup("peer verification", e))?;
            easy.ssl_verify_host(false)
                .map_err(|e| setup("host verification", e))?;
        }
        Ok(())
    }
}

/// Split `user:password` at the first colon; a missing colon means an empty password.
fn split_credentials(credentials: &str) -> (&str, &str) {
    credentials.split_once(':').unwrap_or((credentials, ""))
}
