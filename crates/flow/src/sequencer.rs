//! Slide sequencing state machine: advance, capture, completion.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::debug;

use fez_core::types::{AnswerEvent, AnswerValue, QuestionKind, SlideHandle, SurveySession};
use fez_core::{schema, SurveyConfig, SurveyError, SurveyResult};
use fez_delivery::SubmissionClient;

use crate::render::SlideRenderer;

/// Where the machine is in the slide walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Attached, nothing shown yet.
    Idle,
    /// The slide at this index is active.
    OnSlide(usize),
    /// The thank-you slide is showing. Terminal.
    Finished,
}

/// Drives a session's slides forward, one visitor interaction at a time.
///
/// The walk only moves forward: `Idle` → `OnSlide(0)` → … →
/// `OnSlide(n-1)` → `Finished`, with the thank-you slide appended lazily on
/// the final step. Submission fires on that step, exactly once.
pub struct SlideSequencer {
    session: SurveySession,
    state: SequencerState,
    submitted: bool,
    renderer: Arc<dyn SlideRenderer>,
    submitter: SubmissionClient,
    config: SurveyConfig,
}

impl SlideSequencer {
    /// Builds the machine over a session whose slides were already rendered,
    /// one per question, in order. Refuses an empty deck: with zero
    /// questions there is nothing to sequence.
    pub fn new(
        session: SurveySession,
        renderer: Arc<dyn SlideRenderer>,
        submitter: SubmissionClient,
        config: SurveyConfig,
    ) -> SurveyResult<Self> {
        if session.questions.is_empty() {
            return Err(SurveyError::Schema(schema::MISSING_QUESTIONS.to_string()));
        }
        if session.slides.len() != session.questions.len() {
            return Err(SurveyError::Renderer(anyhow!(
                "slide count {} does not match question count {}",
                session.slides.len(),
                session.questions.len()
            )));
        }

        Ok(Self {
            session,
            state: SequencerState::Idle,
            submitted: false,
            renderer,
            submitter,
            config,
        })
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn session(&self) -> &SurveySession {
        &self.session
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    /// Moves to the next slide. From `Idle` this shows the first slide; the
    /// step past the last question appends the thank-you slide, shows it,
    /// and fires submission; in `Finished` it is a no-op.
    pub fn advance(&mut self) {
        let next = match self.state {
            SequencerState::Idle => 0,
            SequencerState::OnSlide(index) => index + 1,
            SequencerState::Finished => {
                debug!(session = %self.session.id, "Advance after completion ignored");
                return;
            }
        };

        // Lazy terminal slide: the deck grows by one exactly once, when the
        // walk first steps past the last real question.
        let mut finishing = false;
        if next == self.session.slides.len() {
            let thanks = self.renderer.build_thanks_slide();
            self.session.slides.push(thanks);
            finishing = true;
            debug!(session = %self.session.id, "Thank-you slide appended");
        }

        if let SequencerState::OnSlide(current) = self.state {
            self.renderer.set_active(self.session.slides[current], false);
        }

        let slide = self.session.slides[next];
        self.renderer.set_active(slide, true);
        self.state = if finishing {
            SequencerState::Finished
        } else {
            SequencerState::OnSlide(next)
        };
        debug!(session = %self.session.id, index = next, finishing, "Slide activated");

        if finishing && !self.submitted {
            self.submitted = true;
            self.submitter.submit(&self.session);
        }

        self.spawn_measure(slide);
    }

    /// Captures the interaction's answer (where the active question's kind
    /// defines capture) and advances. Events that do not belong to the
    /// currently active slide are dropped.
    pub fn handle_event(&mut self, event: AnswerEvent) {
        let current = match self.state {
            SequencerState::OnSlide(index) => index,
            SequencerState::Idle | SequencerState::Finished => {
                debug!(
                    session = %self.session.id,
                    index = event.index,
                    "Event outside an active slide ignored"
                );
                return;
            }
        };

        if event.index != current {
            debug!(
                session = %self.session.id,
                index = event.index,
                current,
                "Event for inactive slide ignored"
            );
            return;
        }

        self.capture(current, event.value);
        self.advance();
    }

    fn capture(&mut self, index: usize, value: AnswerValue) {
        let session_id = self.session.id;
        let question = &mut self.session.questions[index];

        match (question.kind, value) {
            (QuestionKind::Likert | QuestionKind::Rating, AnswerValue::Selected(label)) => {
                question.answer = Some(label);
                debug!(session = %session_id, index, kind = ?question.kind, "Answer captured");
            }
            (QuestionKind::Open, AnswerValue::Text(content)) => {
                question.answer = Some(content);
                debug!(session = %session_id, index, kind = ?question.kind, "Answer captured");
            }
            // Composite selections are read on the renderer's side of the
            // boundary; the engine records nothing for these kinds.
            (QuestionKind::Multiple | QuestionKind::Single, _) => {
                debug!(
                    session = %session_id,
                    index,
                    kind = ?question.kind,
                    "No automatic capture for this question kind"
                );
            }
            (kind, _) => {
                debug!(
                    session = %session_id,
                    index,
                    ?kind,
                    "Interaction shape does not match question kind, ignored"
                );
            }
        }
    }

    // Fire-and-forget: a slow measurement delays only the resize, never the
    // next transition.
    fn spawn_measure(&self, slide: SlideHandle) {
        let receiver = self.renderer.measure_height(slide);
        let renderer = Arc::clone(&self.renderer);
        let bound_ms = self.config.measure_timeout_ms;
        let session_id = self.session.id;

        tokio::spawn(async move {
            let height = match bound_ms {
                Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), receiver).await {
                    Ok(measured) => measured.ok(),
                    Err(_) => {
                        debug!(session = %session_id, "Height measurement timed out, skipping resize");
                        None
                    }
                },
                None => receiver.await.ok(),
            };

            if let Some(height) = height {
                renderer.resize_surface(height);
            }
        });
    }
}
