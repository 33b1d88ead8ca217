//! Rendering boundary: how the engine talks to whatever draws slides.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::debug;

use fez_core::types::{QuestionKind, QuestionSpec, SlideHandle};

/// Acknowledgment copy on the terminal slide.
pub const THANK_YOU_COPY: &str = "Thank you!";

const DEFAULT_HEIGHT: f64 = 320.0;

/// Draws slides and answers geometry queries. Implementations live on the
/// host side of the boundary; the engine drives them through opaque handles.
///
/// Interaction events are not part of this trait: the host wires its input
/// machinery to the controller's event channel. For an open slide both the
/// affirmative and the skip affordance must advance, each reporting the
/// textarea's current content (an empty string when skipped untouched).
pub trait SlideRenderer: Send + Sync {
    /// Renders one question as a slide. Failing here aborts survey
    /// construction before anything is shown.
    fn build_slide(&self, question: &QuestionSpec, index: usize) -> Result<SlideHandle>;

    /// Renders the terminal acknowledgment slide. Static copy, infallible:
    /// it runs mid-flight, where nothing may break the host.
    fn build_thanks_slide(&self) -> SlideHandle;

    /// Marks a slide visible or hidden.
    fn set_active(&self, slide: SlideHandle, active: bool);

    /// Measures a slide's rendered height. The engine awaits the receiver on
    /// a spawned task; a sender that is never completed means the surface
    /// simply keeps its current height.
    fn measure_height(&self, slide: SlideHandle) -> oneshot::Receiver<f64>;

    /// Resizes the surface containing the slides.
    fn resize_surface(&self, height: f64);
}

/// Bookkeeping entry behind a [`HeadlessRenderer`] handle.
#[derive(Debug, Clone)]
pub struct VirtualSlide {
    pub title: String,
    /// Option labels shown on likert/rating slides; empty otherwise.
    pub labels: Vec<String>,
    pub active: bool,
}

/// Renderer with no display surface: slides are bookkeeping entries. Used by
/// tests and by hosts that drive their own UI from the engine's calls.
pub struct HeadlessRenderer {
    slides: DashMap<u64, VirtualSlide>,
    next_id: AtomicU64,
    height: f64,
    surface_height: Mutex<Option<f64>>,
    thanks_built: AtomicUsize,
    /// Senders held open so their receivers never resolve.
    parked: Mutex<Vec<oneshot::Sender<f64>>>,
    resolve_heights: bool,
    fail_at: Option<usize>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::with_height(DEFAULT_HEIGHT)
    }

    /// Renderer whose measurements resolve immediately with `height`.
    pub fn with_height(height: f64) -> Self {
        Self {
            slides: DashMap::new(),
            next_id: AtomicU64::new(0),
            height,
            surface_height: Mutex::new(None),
            thanks_built: AtomicUsize::new(0),
            parked: Mutex::new(Vec::new()),
            resolve_heights: true,
            fail_at: None,
        }
    }

    /// Renderer whose measurements never resolve, for exercising the
    /// unbounded-wait path.
    pub fn unresponsive() -> Self {
        Self {
            resolve_heights: false,
            ..Self::new()
        }
    }

    /// Renderer that refuses to build the slide at `index`, for exercising
    /// the construction-abort path.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    pub fn slide(&self, handle: SlideHandle) -> Option<VirtualSlide> {
        self.slides.get(&handle.raw()).map(|entry| entry.value().clone())
    }

    /// Total slides built so far, thank-you slide included.
    pub fn built_count(&self) -> usize {
        self.slides.len()
    }

    pub fn active_count(&self) -> usize {
        self.slides.iter().filter(|entry| entry.active).count()
    }

    pub fn active_slide(&self) -> Option<SlideHandle> {
        self.slides
            .iter()
            .find(|entry| entry.active)
            .map(|entry| SlideHandle::new(*entry.key()))
    }

    pub fn thanks_built(&self) -> usize {
        self.thanks_built.load(Ordering::Relaxed)
    }

    /// Last height applied via `resize_surface`, if any.
    pub fn surface_height(&self) -> Option<f64> {
        *self
            .surface_height
            .lock()
            .expect("surface height mutex poisoned")
    }

    fn insert(&self, slide: VirtualSlide) -> SlideHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slides.insert(id, slide);
        SlideHandle::new(id)
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideRenderer for HeadlessRenderer {
    fn build_slide(&self, question: &QuestionSpec, index: usize) -> Result<SlideHandle> {
        if self.fail_at == Some(index) {
            return Err(anyhow!("no display surface for slide {}", index));
        }
        let labels = match question.kind {
            QuestionKind::Likert | QuestionKind::Rating => question.scale(),
            QuestionKind::Multiple | QuestionKind::Open | QuestionKind::Single => Vec::new(),
        };
        let handle = self.insert(VirtualSlide {
            title: question.text.clone(),
            labels,
            active: false,
        });
        debug!(index, slide = handle.raw(), "Virtual slide built");
        Ok(handle)
    }

    fn build_thanks_slide(&self) -> SlideHandle {
        self.thanks_built.fetch_add(1, Ordering::Relaxed);
        self.insert(VirtualSlide {
            title: THANK_YOU_COPY.to_string(),
            labels: Vec::new(),
            active: false,
        })
    }

    fn set_active(&self, slide: SlideHandle, active: bool) {
        if let Some(mut entry) = self.slides.get_mut(&slide.raw()) {
            entry.active = active;
        }
    }

    fn measure_height(&self, slide: SlideHandle) -> oneshot::Receiver<f64> {
        let (tx, rx) = oneshot::channel();
        if self.resolve_heights {
            let _ = tx.send(self.height);
        } else {
            debug!(slide = slide.raw(), "Parking height measurement");
            self.parked.lock().expect("parked senders mutex poisoned").push(tx);
        }
        rx
    }

    fn resize_surface(&self, height: f64) {
        *self
            .surface_height
            .lock()
            .expect("surface height mutex poisoned") = Some(height);
    }
}
