//! Best-effort delivery of completed surveys to the response endpoint.

pub mod client;
pub mod transport;

pub use client::SubmissionClient;
pub use transport::{
    capture_transport, noop_transport, CaptureTransport, NoopTransport, ResponseTransport,
};
