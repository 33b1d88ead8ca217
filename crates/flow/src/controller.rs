//! Survey lifecycle orchestration, from raw payload to finished flow.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

use fez_core::types::{AnswerEvent, SurveySession};
use fez_core::{schema, SurveyConfig, SurveyError, SurveyResult};
use fez_delivery::SubmissionClient;
use fez_store::DedupeGuard;

use crate::render::SlideRenderer;
use crate::sequencer::{SequencerState, SlideSequencer};

/// Raised when no question payload was supplied at all.
pub const NO_QUESTION_SOURCE: &str =
    "Surveys must have a question source, with the ID \"surveyQuestions\"";

/// Ties the pieces together for one survey: validated questions, dedupe
/// check, rendered slides, and the sequencer that walks them.
///
/// Construction is all-or-nothing. `launch` either returns a fully wired
/// controller, `Ok(None)` when the visitor is inside the cooldown window, or
/// an error with nothing built. Once built, nothing here fails the host.
pub struct SurveyController {
    sequencer: SlideSequencer,
    config: SurveyConfig,
}

impl SurveyController {
    /// Validates the raw payload, consults the dedupe guard, and builds the
    /// slide deck. `payload` is the already-resolved question source;
    /// `None` means the host page has no such source at all.
    pub fn launch(
        payload: Option<&str>,
        renderer: Arc<dyn SlideRenderer>,
        guard: DedupeGuard,
        submitter: SubmissionClient,
        config: SurveyConfig,
    ) -> SurveyResult<Option<Self>> {
        let raw = match payload {
            Some(raw) => raw,
            None => return Err(SurveyError::Configuration(NO_QUESTION_SOURCE.to_string())),
        };

        let value: Value = serde_json::from_str(raw)?;
        let parsed = schema::parse_payload(&value)?;

        if !guard.should_show(&parsed.survey) {
            info!(survey = %parsed.survey, "Survey suppressed by cooldown");
            return Ok(None);
        }

        let mut session = SurveySession::new(parsed.survey, parsed.questions);
        let mut slides = Vec::with_capacity(session.questions.len());
        for (index, question) in session.questions.iter().enumerate() {
            slides.push(renderer.build_slide(question, index)?);
        }
        session.slides = slides;

        info!(
            survey = %session.name,
            session = %session.id,
            questions = session.questions.len(),
            "Survey session created"
        );

        let sequencer = SlideSequencer::new(session, renderer, submitter, config.clone())?;
        Ok(Some(Self { sequencer, config }))
    }

    /// Drives the flow: sleeps the first-advance delay, shows the first
    /// slide, then applies interaction events in arrival order until the
    /// sender side is dropped. Hands the controller back so the host can
    /// inspect the finished session.
    pub async fn run(mut self, mut events: mpsc::Receiver<AnswerEvent>) -> Self {
        tokio::time::sleep(Duration::from_millis(self.config.first_advance_delay_ms)).await;
        self.sequencer.advance();

        while let Some(event) = events.recv().await {
            self.sequencer.handle_event(event);
        }

        debug!(session = %self.sequencer.session().id, "Event channel closed, flow loop ended");
        self
    }

    pub fn advance(&mut self) {
        self.sequencer.advance();
    }

    pub fn handle_event(&mut self, event: AnswerEvent) {
        self.sequencer.handle_event(event);
    }

    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    pub fn session(&self) -> &SurveySession {
        self.sequencer.session()
    }
}
