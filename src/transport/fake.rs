//! Fake transport for testing
//!
//! Uses fixture strings instead of real HTTP calls and records every request
//! it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::transport::types::{HttpResponse, SyncTransport, TransportError};

/// One request seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Fake transport for testing (uses fixture strings)
///
/// Queued responses are consumed first, in order. Once the queue is empty
/// every request gets the fallback response (or fallback error).
#[derive(Debug)]
pub struct FakeTransport {
    /// Response body returned once the queue is drained
    pub response_body: String,
    /// Error returned once the queue is drained (takes precedence)
    pub error: Option<TransportError>,
    queued: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    /// Create fake transport with given response
    pub fn new(response: &str) -> Self {
        Self {
            response_body: response.to_string(),
            error: None,
            queued: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create fake transport that returns a network error
    pub fn with_error(msg: &str) -> Self {
        Self {
            response_body: String::new(),
            error: Some(TransportError::Network(msg.to_string())),
            queued: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create fake transport that replays `responses` in order
    pub fn with_responses(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            response_body: String::new(),
            error: Some(TransportError::Network(
                "fake transport: no more queued responses".to_string(),
            )),
            queued: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn respond(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRequest {
                method: method.to_string(),
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.to_string(),
            });

        let next = self
            .queued
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        if let Some(response) = next {
            return response;
        }

        if let Some(ref err) = self.error {
            return Err(err.clone());
        }
        Ok(HttpResponse::ok(&self.response_body))
    }
}

impl SyncTransport for FakeTransport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, TransportError> {
        self.respond("POST", url, headers, body)
    }

    fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        self.respond("GET", url, headers, "")
    }
}
