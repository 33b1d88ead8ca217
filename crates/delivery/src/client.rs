//! Submission client: serializes a finished session and reports it.

use std::sync::Arc;

use tracing::{info, warn};

use fez_core::types::{SubmissionBody, SurveySession};
use fez_core::SurveyConfig;
use fez_store::DedupeGuard;

use crate::transport::ResponseTransport;

/// Posts the completed answer set and records the dedupe expiration.
///
/// Fire-and-forget: the POST is issued and never awaited, and the expiration
/// record is written immediately after issue regardless of delivery outcome.
/// Not idempotent: calling twice produces two POSTs; at-most-once is the
/// caller's invariant to hold.
#[derive(Clone)]
pub struct SubmissionClient {
    transport: Arc<dyn ResponseTransport>,
    guard: DedupeGuard,
    config: SurveyConfig,
}

impl SubmissionClient {
    pub fn new(
        transport: Arc<dyn ResponseTransport>,
        guard: DedupeGuard,
        config: SurveyConfig,
    ) -> Self {
        Self {
            transport,
            guard,
            config,
        }
    }

    pub fn submit(&self, session: &SurveySession) {
        let body = SubmissionBody::from_session(session);

        match serde_json::to_string(&body) {
            Ok(json) => {
                self.transport.post_json(&self.config.endpoint_path, json);
                info!(
                    survey = %session.name,
                    session = %session.id,
                    questions = session.questions.len(),
                    "Survey response dispatched"
                );
            }
            Err(e) => {
                warn!(survey = %session.name, error = %e, "Failed to serialize survey response");
            }
        }

        self.guard
            .record_shown(&session.name, session.shown_at, self.config.cooldown_ms);
    }
}
