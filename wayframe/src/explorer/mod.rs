//! Explorer session: the single owner of selection, route and playback.
//!
//! [`Explorer`] is synchronous and deterministic. It turns user events into
//! surface commands and, when the endpoint pair needs a route, hands back a
//! [`RouteRequest`] for the caller to dispatch. Results come back through
//! [`Explorer::apply_route`], which drops anything stale.
//!
//! [`ExplorerLoop`] drives an `Explorer` on tokio.
//!
//! # Example
//!
//! ```ignore
//! let mut explorer = Explorer::new(RecordingSurface::new(), PlaybackConfig::default());
//!
//! explorer.handle(ExplorerEvent::Click(start));
//! if let Some(request) = explorer.handle(ExplorerEvent::Click(goal)) {
//!     let result = router.route(request.origin, request.destination).await;
//!     explorer.apply_route(request.token, result);
//! }
//! ```

mod runner;

pub use runner::{ExplorerLoop, DEFAULT_AUTOPLAY_INTERVAL};

use tracing::{debug, warn};

use crate::acquisition::{
    AcquisitionState, RequestToken, Resolution, RouteAcquisition, RouteRequest, RouteSummary,
};
use crate::frames::ExplorationFrame;
use crate::geo::GeoPoint;
use crate::playback::{PlaybackConfig, PlaybackController};
use crate::routing::{RouteError, RouteResponse};
use crate::selection::{PairTransition, PointSelection, SelectionMode};
use crate::surface::{Canvas, MapSurface};

/// A user action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplorerEvent {
    /// Map click at a location
    Click(GeoPoint),
    /// Choose which endpoint the next click sets
    SetMode(SelectionMode),
    /// Exchange start and goal
    Swap,
    /// Clear both endpoints
    Reset,
    /// Jump to a frame (clamped)
    SetIndex(usize),
    /// Next frame
    StepForward,
    /// Previous frame
    StepBack,
    /// Flip viewport follow
    ToggleFollow,
    /// Start autoplay
    Play,
    /// Stop autoplay
    Pause,
}

/// Owned view of the session, with derived windows already computed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExplorerSnapshot {
    /// Endpoint the next click sets
    pub mode: SelectionMode,
    /// Selected start, if any
    pub start: Option<GeoPoint>,
    /// Selected goal, if any
    pub end: Option<GeoPoint>,
    /// Route acquisition state
    pub state: AcquisitionState,
    /// Distance, duration and geometry of the current route
    pub summary: Option<RouteSummary>,
    /// Why the last request failed
    pub error: Option<RouteError>,
    /// Number of frames in the sequence
    pub frame_count: usize,
    /// Selected frame, `None` when there are no frames
    pub current_index: Option<usize>,
    /// The frame at `current_index`
    pub current_frame: Option<ExplorationFrame>,
    /// Frames just behind the current one, nearest first
    pub recently_closed: Vec<ExplorationFrame>,
    /// Frames just ahead of the current one, nearest first
    pub upcoming_open: Vec<ExplorationFrame>,
    /// Whether index changes pan the viewport
    pub follow: bool,
    /// Whether autoplay is running
    pub playing: bool,
}

/// Interactive route exploration over a map surface.
#[derive(Debug)]
pub struct Explorer<S> {
    canvas: Canvas<S>,
    selection: PointSelection,
    acquisition: RouteAcquisition,
    playback: PlaybackController,
}

impl<S: MapSurface> Explorer<S> {
    /// Fresh session with nothing selected.
    pub fn new(surface: S, config: PlaybackConfig) -> Self {
        Self::with_canvas(Canvas::new(surface), PlaybackController::new(config))
    }

    /// Session over a prepared canvas and playback controller.
    pub fn with_canvas(canvas: Canvas<S>, playback: PlaybackController) -> Self {
        Self {
            canvas,
            selection: PointSelection::new(),
            acquisition: RouteAcquisition::new(),
            playback,
        }
    }

    /// Marker registry and the surface behind it.
    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    /// Mutable access to the canvas.
    pub fn canvas_mut(&mut self) -> &mut Canvas<S> {
        &mut self.canvas
    }

    /// Endpoint selection.
    pub fn selection(&self) -> &PointSelection {
        &self.selection
    }

    /// Route request state.
    pub fn acquisition(&self) -> &RouteAcquisition {
        &self.acquisition
    }

    /// Frame playback.
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Apply one event. Returns the route request to dispatch, if any.
    pub fn handle(&mut self, event: ExplorerEvent) -> Option<RouteRequest> {
        match event {
            ExplorerEvent::Click(point) => {
                let transition = match self.selection.handle_click(point, &mut self.canvas) {
                    // Re-picking the same point after a failure retries
                    PairTransition::Unchanged
                        if self.acquisition.state() == AcquisitionState::Failed =>
                    {
                        debug!("Retrying failed route");
                        PairTransition::Edited
                    }
                    transition => transition,
                };
                self.react(transition)
            }
            ExplorerEvent::SetMode(mode) => {
                self.selection.set_mode(mode);
                None
            }
            ExplorerEvent::Swap => match self.selection.swap(&mut self.canvas) {
                Ok(transition) => self.react(transition),
                Err(e) => {
                    debug!(error = %e, "Swap ignored");
                    None
                }
            },
            ExplorerEvent::Reset => {
                let transition = self.selection.reset(&mut self.canvas);
                self.react(transition)
            }
            ExplorerEvent::SetIndex(index) => {
                self.playback.set_index(index, &mut self.canvas);
                None
            }
            ExplorerEvent::StepForward => {
                self.playback.step_forward(&mut self.canvas);
                None
            }
            ExplorerEvent::StepBack => {
                self.playback.step_back(&mut self.canvas);
                None
            }
            ExplorerEvent::ToggleFollow => {
                self.playback.toggle_follow();
                None
            }
            ExplorerEvent::Play => {
                self.playback.play(&mut self.canvas);
                None
            }
            ExplorerEvent::Pause => {
                self.playback.pause();
                None
            }
        }
    }

    fn react(&mut self, transition: PairTransition) -> Option<RouteRequest> {
        match transition {
            PairTransition::Completed | PairTransition::Edited => {
                let (start, end) = self.selection.pair()?;
                Some(self.acquisition.begin(start, end))
            }
            PairTransition::Broken => {
                self.acquisition.clear();
                self.drop_route();
                None
            }
            PairTransition::Unchanged => None,
        }
    }

    fn drop_route(&mut self) {
        self.playback.clear(&mut self.canvas);
        self.canvas.clear_route();
    }

    /// Apply a routing result. Returns `false` if it was stale.
    pub fn apply_route(
        &mut self,
        token: RequestToken,
        result: Result<RouteResponse, RouteError>,
    ) -> bool {
        match self.acquisition.resolve(token, result) {
            Resolution::Stale => false,
            Resolution::Success(frames) => {
                if let Some(summary) = self.acquisition.summary() {
                    self.canvas.draw_route(&summary.geometry);
                }
                self.playback.replace_frames(frames, &mut self.canvas);
                true
            }
            Resolution::Failed(error) => {
                warn!(error = %error, "Route unavailable");
                self.drop_route();
                true
            }
        }
    }

    /// One autoplay step. Returns whether autoplay is still running.
    pub fn tick(&mut self) -> bool {
        self.playback.tick(&mut self.canvas)
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> ExplorerSnapshot {
        ExplorerSnapshot {
            mode: self.selection.mode(),
            start: self.selection.start(),
            end: self.selection.end(),
            state: self.acquisition.state(),
            summary: self.acquisition.summary().cloned(),
            error: self.acquisition.error().cloned(),
            frame_count: self.playback.frames().len(),
            current_index: self.playback.current_index(),
            current_frame: self.playback.current_frame().copied(),
            recently_closed: self.playback.recently_closed(),
            upcoming_open: self.playback.upcoming_open(),
            follow: self.playback.is_following(),
            playing: self.playback.is_playing(),
        }
    }
}
