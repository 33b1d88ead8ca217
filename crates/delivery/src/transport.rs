//! Outbound transport boundary for completed surveys.

use std::sync::{Arc, Mutex};

use tracing::debug;

/// Best-effort delivery of a serialized survey response.
///
/// Implementations must not block the caller and must swallow failures: the
/// engine never consumes a response, checks a status code, or retries. The
/// expected wire call is `POST {origin}{path}` with
/// `Content-Type: application/json` and caching disabled.
pub trait ResponseTransport: Send + Sync {
    fn post_json(&self, path: &str, body: String);
}

/// Transport that drops every document, for hosts that wire delivery
/// elsewhere.
pub struct NoopTransport;

impl ResponseTransport for NoopTransport {
    fn post_json(&self, path: &str, body: String) {
        debug!(path = %path, bytes = body.len(), "Dropping survey response (noop transport)");
    }
}

/// In-memory transport that records every document, for tests and dry runs.
#[derive(Default)]
pub struct CaptureTransport {
    posts: Mutex<Vec<(String, String)>>,
}

impl CaptureTransport {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
        }
    }

    /// Recorded `(path, body)` pairs, in post order.
    pub fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().expect("transport mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.posts.lock().expect("transport mutex poisoned").len()
    }

    pub fn clear(&self) {
        self.posts.lock().expect("transport mutex poisoned").clear();
    }
}

impl ResponseTransport for CaptureTransport {
    fn post_json(&self, path: &str, body: String) {
        self.posts
            .lock()
            .expect("transport mutex poisoned")
            .push((path.to_string(), body));
    }
}

/// Convenience: a transport that discards everything.
pub fn noop_transport() -> Arc<dyn ResponseTransport> {
    Arc::new(NoopTransport)
}

/// Convenience: a capturing transport for tests.
pub fn capture_transport() -> Arc<CaptureTransport> {
    Arc::new(CaptureTransport::new())
}
