//! HTTP transport
//!
//! Provides a synchronous HTTP client behind the `SyncTransport` trait.
//! Uses ureq for blocking I/O; `FakeTransport` replays fixtures in tests.

mod fake;
mod types;
mod ureq_transport;

use std::sync::Arc;

pub use fake::{FakeTransport, RecordedRequest};
pub use types::{HttpResponse, SyncTransport, TransportError};
pub use ureq_transport::{UreqTransport, DEFAULT_TIMEOUT_SECS};

/// Concrete transport enum
///
/// Wraps all transport types, avoiding dyn compatibility issues. The fake is
/// shared through an `Arc` so tests can inspect recorded requests after
/// handing the transport to a client.
#[derive(Debug, Clone)]
pub enum Transport {
    Real(Arc<UreqTransport>),
    Fake(Arc<FakeTransport>),
}

impl Transport {
    pub fn real(timeout_secs: u64) -> Self {
        Transport::Real(Arc::new(UreqTransport::with_timeout(timeout_secs)))
    }

    pub fn fake(fake: FakeTransport) -> (Self, Arc<FakeTransport>) {
        let shared = Arc::new(fake);
        (Transport::Fake(Arc::clone(&shared)), shared)
    }
}

impl SyncTransport for Transport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, TransportError> {
        match self {
            Transport::Real(t) => t.post_json(url, headers, body),
            Transport::Fake(t) => t.post_json(url, headers, body),
        }
    }

    fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        match self {
            Transport::Real(t) => t.get_json(url, headers),
            Transport::Fake(t) => t.get_json(url, headers),
        }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Transport::Real(Arc::new(UreqTransport::new()))
    }
}
