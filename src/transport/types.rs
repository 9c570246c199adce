//! Transport types
//!
//! Common types shared across transport implementations.

/// Transport errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Network error (connection refused, timeout, TLS, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP error (non-2xx status); body kept verbatim
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// IO error while reading the response body
    #[error("IO error: {0}")]
    Io(String),
}

impl TransportError {
    /// Status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err.to_string())
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => TransportError::Http {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(err) => TransportError::Network(err.to_string()),
        }
    }
}

/// Successful response: status code plus body
///
/// 2xx statuses other than 200 matter to some callers (202 = still running).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }
}

/// Synchronous HTTP transport
///
/// Abstraction over the HTTP client to enable testing with FakeTransport.
pub trait SyncTransport: Send + Sync {
    /// POST a JSON body and return the response
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, TransportError>;

    /// GET a URL and return the response
    fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;
}
