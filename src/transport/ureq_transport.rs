//! Real HTTP transport using ureq
//!
//! Synchronous blocking HTTP client shared by the model gateway and the
//! Snowflake warehouse client.

use std::time::Duration;

use crate::transport::types::{HttpResponse, SyncTransport, TransportError};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Real HTTP transport using ureq
#[derive(Debug)]
pub struct UreqTransport {
    /// Timeout in seconds for requests
    timeout: u64,
}

impl UreqTransport {
    /// Create new transport with default timeout
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create transport with custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            timeout: timeout_secs,
        }
    }

    fn request(&self, method: &str, url: &str, headers: &[(&str, &str)]) -> ureq::Request {
        let mut request =
            ureq::request(method, url).timeout(Duration::from_secs(self.timeout));
        for (key, value) in headers {
            request = request.set(key, value);
        }
        request
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn read_response(response: ureq::Response) -> Result<HttpResponse, TransportError> {
    let status = response.status();
    let body = response.into_string()?;
    // ureq reports 4xx/5xx as Error::Status; guard anyway for redirect edge cases
    if status >= 400 {
        return Err(TransportError::Http { status, body });
    }
    Ok(HttpResponse { status, body })
}

impl SyncTransport for UreqTransport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, TransportError> {
        tracing::debug!(url, timeout = self.timeout, body_len = body.len(), "HTTP POST");
        let response = self.request("POST", url, headers).send_string(body)?;
        tracing::debug!(status = response.status(), "HTTP response");
        read_response(response)
    }

    fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        tracing::debug!(url, timeout = self.timeout, "HTTP GET");
        let response = self.request("GET", url, headers).call()?;
        tracing::debug!(status = response.status(), "HTTP response");
        read_response(response)
    }
}
