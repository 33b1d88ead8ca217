//! Survey flow engine: slide rendering boundary, the sequencing state
//! machine, and the controller that orchestrates a session end to end.

pub mod controller;
pub mod render;
pub mod sequencer;

pub use controller::{SurveyController, NO_QUESTION_SOURCE};
pub use render::{HeadlessRenderer, SlideRenderer, THANK_YOU_COPY};
pub use sequencer::{SequencerState, SlideSequencer};
