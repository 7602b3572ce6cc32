//! Frame-indexed playback of an exploration sequence.
//!
//! Playback owns the current frame index and derives two windows around it
//! on demand:
//!
//! - **recently closed**: frames at or before the index, newest first
//! - **upcoming open**: frames after the index, in order
//!
//! Nothing derived is cached, so the windows always match the current
//! sequence and index.

use tracing::{debug, trace};

use crate::frames::{ExplorationFrame, FrameSequence};
use crate::surface::{Canvas, MapSurface, MarkerId};

/// Default number of recently closed frames shown.
pub const DEFAULT_CLOSED_WINDOW: usize = 6;

/// Default number of upcoming open frames shown.
pub const DEFAULT_OPEN_WINDOW: usize = 5;

/// Window sizes for the derived views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Maximum frames returned by `recently_closed`
    pub closed_window: usize,
    /// Maximum frames returned by `upcoming_open`
    pub open_window: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            closed_window: DEFAULT_CLOSED_WINDOW,
            open_window: DEFAULT_OPEN_WINDOW,
        }
    }
}

/// Playback state over a [`FrameSequence`].
///
/// # Usage
///
/// ```ignore
/// let mut playback = PlaybackController::default();
/// playback.replace_frames(frames, &mut canvas);
///
/// playback.set_index(42, &mut canvas);
/// for frame in playback.recently_closed() {
///     println!("{} f={:.0}", frame.index, frame.f);
/// }
/// ```
#[derive(Debug, Default)]
pub struct PlaybackController {
    frames: FrameSequence,
    current: usize,
    follow: bool,
    playing: bool,
    config: PlaybackConfig,
}

impl PlaybackController {
    /// Create an empty controller with custom window sizes.
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Start with follow mode enabled or disabled.
    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    /// The current sequence.
    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    /// Current index, or `None` when there are no frames.
    pub fn current_index(&self) -> Option<usize> {
        (!self.frames.is_empty()).then_some(self.current)
    }

    /// Frame at the current index.
    pub fn current_frame(&self) -> Option<&ExplorationFrame> {
        self.frames.get(self.current)
    }

    /// Whether the viewport follows the current frame.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Whether autoplay is active.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the index is on the last frame (false when empty).
    pub fn at_end(&self) -> bool {
        self.current_index().is_some_and(|i| i + 1 == self.frames.len())
    }

    /// Swap in a new sequence, rewinding to frame 0.
    ///
    /// The exploration marker moves to the first frame, or is removed when
    /// the sequence is empty. Autoplay stops.
    pub fn replace_frames<S: MapSurface>(
        &mut self,
        frames: FrameSequence,
        canvas: &mut Canvas<S>,
    ) {
        self.frames = frames;
        self.current = 0;
        self.playing = false;

        match self.frames.get(0) {
            Some(first) => canvas.place_marker(MarkerId::Exploration, first.point()),
            None => {
                canvas.remove_marker(MarkerId::Exploration);
            }
        }
        debug!(frames = self.frames.len(), "Playback sequence replaced");
    }

    /// Drop all frames and the exploration marker.
    pub fn clear<S: MapSurface>(&mut self, canvas: &mut Canvas<S>) {
        self.replace_frames(FrameSequence::empty(), canvas);
    }

    /// Move to frame `index`, clamped into range.
    ///
    /// Moves the exploration marker and, in follow mode, pans the viewport.
    /// Returns the index actually selected, or `None` when there are no frames.
    pub fn set_index<S: MapSurface>(
        &mut self,
        index: usize,
        canvas: &mut Canvas<S>,
    ) -> Option<usize> {
        let last = self.frames.len().checked_sub(1)?;
        self.current = index.min(last);

        let point = self.frames[self.current].point();
        canvas.place_marker(MarkerId::Exploration, point);
        if self.follow {
            canvas.pan_to(point, true);
        }

        trace!(index = self.current, requested = index, "Playback index set");
        Some(self.current)
    }

    /// Advance one frame. Returns `false` at the end or when empty.
    pub fn step_forward<S: MapSurface>(&mut self, canvas: &mut Canvas<S>) -> bool {
        if self.frames.is_empty() || self.at_end() {
            return false;
        }
        self.set_index(self.current + 1, canvas).is_some()
    }

    /// Go back one frame. Returns `false` at the start or when empty.
    pub fn step_back<S: MapSurface>(&mut self, canvas: &mut Canvas<S>) -> bool {
        if self.frames.is_empty() || self.current == 0 {
            return false;
        }
        self.set_index(self.current - 1, canvas).is_some()
    }

    /// Up to `closed_window` frames with index <= current, newest first.
    pub fn recently_closed(&self) -> Vec<ExplorationFrame> {
        if self.frames.is_empty() {
            return Vec::new();
        }
        self.frames.as_slice()[..=self.current]
            .iter()
            .rev()
            .take(self.config.closed_window)
            .copied()
            .collect()
    }

    /// Up to `open_window` frames with index > current, in order.
    pub fn upcoming_open(&self) -> Vec<ExplorationFrame> {
        if self.frames.is_empty() {
            return Vec::new();
        }
        self.frames.as_slice()[self.current + 1..]
            .iter()
            .take(self.config.open_window)
            .copied()
            .collect()
    }

    /// Flip follow mode. Does not move the viewport.
    pub fn toggle_follow(&mut self) -> bool {
        self.follow = !self.follow;
        debug!(follow = self.follow, "Follow mode toggled");
        self.follow
    }

    /// Start autoplay, rewinding first if already on the last frame.
    ///
    /// Returns `false` when there is nothing to play.
    pub fn play<S: MapSurface>(&mut self, canvas: &mut Canvas<S>) -> bool {
        if self.frames.len() < 2 {
            return false;
        }
        if self.at_end() {
            self.set_index(0, canvas);
        }
        self.playing = true;
        true
    }

    /// Stop autoplay.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// One autoplay tick: step forward and stop on the last frame.
    ///
    /// Returns whether playback is still running.
    pub fn tick<S: MapSurface>(&mut self, canvas: &mut Canvas<S>) -> bool {
        if !self.playing {
            return false;
        }
        if !self.step_forward(canvas) || self.at_end() {
            self.playing = false;
        }
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::build_frames;
    use crate::geo::GeoPoint;
    use crate::surface::{RecordingSurface, SurfaceCommand};

    fn frames(n: usize) -> FrameSequence {
        let geometry: Vec<GeoPoint> = (0..n)
            .map(|i| GeoPoint::new(0.0, i as f64 * 0.001))
            .collect();
        let goal = geometry.last().copied().unwrap_or(GeoPoint::new(0.0, 0.0));
        build_frames(&geometry, goal)
    }

    fn loaded(n: usize) -> (PlaybackController, Canvas<RecordingSurface>) {
        let mut canvas = Canvas::new(RecordingSurface::new());
        let mut playback = PlaybackController::default();
        playback.replace_frames(frames(n), &mut canvas);
        canvas.surface_mut().clear();
        (playback, canvas)
    }

    fn indices(frames: &[ExplorationFrame]) -> Vec<usize> {
        frames.iter().map(|f| f.index).collect()
    }

    #[test]
    fn test_empty_controller_degrades() {
        let mut canvas = Canvas::new(RecordingSurface::new());
        let mut playback = PlaybackController::default();

        assert_eq!(playback.current_index(), None);
        assert!(playback.current_frame().is_none());
        assert!(playback.recently_closed().is_empty());
        assert!(playback.upcoming_open().is_empty());
        assert_eq!(playback.set_index(3, &mut canvas), None);
        assert!(!playback.step_forward(&mut canvas));
        assert!(!playback.step_back(&mut canvas));
        assert!(!playback.play(&mut canvas));
        assert!(canvas.surface().commands().is_empty());
    }

    #[test]
    fn test_replace_places_marker_at_first_frame() {
        let mut canvas = Canvas::new(RecordingSurface::new());
        let mut playback = PlaybackController::default();

        playback.replace_frames(frames(4), &mut canvas);

        assert_eq!(playback.current_index(), Some(0));
        assert_eq!(
            canvas.surface().commands(),
            &[SurfaceCommand::DrawMarker {
                id: MarkerId::Exploration,
                point: GeoPoint::new(0.0, 0.0),
                label: None
            }]
        );
    }

    #[test]
    fn test_replace_resets_index() {
        let (mut playback, mut canvas) = loaded(10);
        playback.set_index(7, &mut canvas);

        playback.replace_frames(frames(3), &mut canvas);

        assert_eq!(playback.current_index(), Some(0));
    }

    #[test]
    fn test_replace_with_empty_removes_marker() {
        let (mut playback, mut canvas) = loaded(3);

        playback.clear(&mut canvas);

        assert_eq!(playback.current_index(), None);
        assert_eq!(
            canvas.surface().commands(),
            &[SurfaceCommand::RemoveMarker {
                id: MarkerId::Exploration
            }]
        );
    }

    #[test]
    fn test_set_index_clamps() {
        let (mut playback, mut canvas) = loaded(5);

        assert_eq!(playback.set_index(99, &mut canvas), Some(4));
        assert_eq!(playback.current_frame().unwrap().index, 4);
        assert!(playback.at_end());
    }

    #[test]
    fn test_set_index_moves_marker_without_pan() {
        let (mut playback, mut canvas) = loaded(5);

        playback.set_index(2, &mut canvas);

        assert_eq!(
            canvas.surface().commands(),
            &[SurfaceCommand::MoveMarker {
                id: MarkerId::Exploration,
                point: GeoPoint::new(0.0, 0.002)
            }]
        );
    }

    #[test]
    fn test_follow_pans_on_index_change() {
        let (mut playback, mut canvas) = loaded(5);
        assert!(playback.toggle_follow());
        assert!(canvas.surface().commands().is_empty(), "toggle never pans");

        playback.set_index(3, &mut canvas);

        assert_eq!(
            canvas.surface().commands().last(),
            Some(&SurfaceCommand::PanTo {
                point: GeoPoint::new(0.0, 0.003),
                animated: true
            })
        );
        assert!(!playback.toggle_follow());
    }

    #[test]
    fn test_recently_closed_window() {
        let (mut playback, mut canvas) = loaded(20);

        assert_eq!(indices(&playback.recently_closed()), vec![0]);

        playback.set_index(3, &mut canvas);
        assert_eq!(indices(&playback.recently_closed()), vec![3, 2, 1, 0]);

        playback.set_index(10, &mut canvas);
        assert_eq!(
            indices(&playback.recently_closed()),
            vec![10, 9, 8, 7, 6, 5]
        );
    }

    #[test]
    fn test_upcoming_open_window() {
        let (mut playback, mut canvas) = loaded(20);

        assert_eq!(indices(&playback.upcoming_open()), vec![1, 2, 3, 4, 5]);

        playback.set_index(17, &mut canvas);
        assert_eq!(indices(&playback.upcoming_open()), vec![18, 19]);

        playback.set_index(19, &mut canvas);
        assert!(playback.upcoming_open().is_empty());
    }

    #[test]
    fn test_window_bounds_hold_everywhere() {
        let (mut playback, mut canvas) = loaded(15);

        for i in 0..15 {
            playback.set_index(i, &mut canvas);
            let closed = playback.recently_closed();
            let open = playback.upcoming_open();

            assert!(closed.len() <= DEFAULT_CLOSED_WINDOW);
            assert!(open.len() <= DEFAULT_OPEN_WINDOW);
            assert!(closed.windows(2).all(|w| w[0].index > w[1].index));
            assert!(open.windows(2).all(|w| w[0].index < w[1].index));
            assert!(closed.iter().all(|f| f.index <= i));
            assert!(open.iter().all(|f| f.index > i));
        }
    }

    #[test]
    fn test_custom_windows() {
        let mut canvas = Canvas::new(RecordingSurface::new());
        let mut playback = PlaybackController::new(PlaybackConfig {
            closed_window: 2,
            open_window: 1,
        });
        playback.replace_frames(frames(10), &mut canvas);
        playback.set_index(5, &mut canvas);

        assert_eq!(indices(&playback.recently_closed()), vec![5, 4]);
        assert_eq!(indices(&playback.upcoming_open()), vec![6]);
    }

    #[test]
    fn test_stepping() {
        let (mut playback, mut canvas) = loaded(3);

        assert!(!playback.step_back(&mut canvas));
        assert!(playback.step_forward(&mut canvas));
        assert!(playback.step_forward(&mut canvas));
        assert!(!playback.step_forward(&mut canvas));
        assert_eq!(playback.current_index(), Some(2));
        assert!(playback.step_back(&mut canvas));
        assert_eq!(playback.current_index(), Some(1));
    }

    #[test]
    fn test_autoplay_stops_at_end() {
        let (mut playback, mut canvas) = loaded(4);

        assert!(playback.play(&mut canvas));
        assert!(playback.tick(&mut canvas));
        assert!(playback.tick(&mut canvas));
        assert!(!playback.tick(&mut canvas));

        assert!(!playback.is_playing());
        assert_eq!(playback.current_index(), Some(3));
        assert!(!playback.tick(&mut canvas));
    }

    #[test]
    fn test_play_at_end_rewinds() {
        let (mut playback, mut canvas) = loaded(4);
        playback.set_index(3, &mut canvas);

        assert!(playback.play(&mut canvas));
        assert_eq!(playback.current_index(), Some(0));
    }

    #[test]
    fn test_pause_stops_ticks() {
        let (mut playback, mut canvas) = loaded(4);
        playback.play(&mut canvas);
        playback.pause();

        assert!(!playback.tick(&mut canvas));
        assert_eq!(playback.current_index(), Some(0));
    }

    #[test]
    fn test_single_frame_cannot_play() {
        let (mut playback, mut canvas) = loaded(1);
        assert!(!playback.play(&mut canvas));
        assert!(playback.at_end());
    }
}
