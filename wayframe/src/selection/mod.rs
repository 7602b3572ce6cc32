//! Start/goal point selection.
//!
//! Map clicks set the start point first, then the goal. Every mutation
//! reports a [`PairTransition`] so the caller can start a route request when
//! the pair becomes complete and clean up when it stops being complete.
//!
//! # State Machine
//!
//! ```text
//! mode=Start --click--> start=p, mode=End
//! mode=End   --click--> end=p            (mode stays End)
//! any        --reset--> start=None, end=None, mode=Start
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::geo::GeoPoint;
use crate::surface::{Canvas, MapSurface, MarkerId};

/// Which endpoint the next click sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Next click sets the start point
    #[default]
    Start,
    /// Next click sets the goal point
    End,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Start => f.write_str("start"),
            SelectionMode::End => f.write_str("end"),
        }
    }
}

impl FromStr for SelectionMode {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" | "s" => Ok(SelectionMode::Start),
            "end" | "goal" | "g" => Ok(SelectionMode::End),
            _ => Err(SelectionError::UnknownMode(s.to_string())),
        }
    }
}

/// Errors from selection operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Swap needs both endpoints.
    #[error("both start and goal must be set to swap")]
    IncompletePair,

    /// Unrecognised mode name.
    #[error("unknown selection mode '{0}' (expected start or end)")]
    UnknownMode(String),
}

/// A complete `(start, end)` pair.
pub type Endpoints = (GeoPoint, GeoPoint);

/// Effect of a mutation on the (start, end) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairTransition {
    /// Pair went from incomplete to complete.
    Completed,
    /// Pair was and still is complete, with different values.
    Edited,
    /// Pair went from complete to incomplete.
    Broken,
    /// Completeness did not change and no complete pair was edited.
    Unchanged,
}

impl PairTransition {
    fn between(before: Option<Endpoints>, after: Option<Endpoints>) -> Self {
        match (before, after) {
            (None, Some(_)) => PairTransition::Completed,
            (Some(_), None) => PairTransition::Broken,
            (Some(b), Some(a)) if b != a => PairTransition::Edited,
            _ => PairTransition::Unchanged,
        }
    }

    /// Whether a route request should be issued.
    pub fn needs_route(&self) -> bool {
        matches!(self, PairTransition::Completed | PairTransition::Edited)
    }
}

/// Tracks the endpoints and which one the next click sets.
#[derive(Debug, Clone, Default)]
pub struct PointSelection {
    mode: SelectionMode,
    start: Option<GeoPoint>,
    end: Option<GeoPoint>,
}

impl PointSelection {
    /// Empty selection in `Start` mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode the next click applies to.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Start point, if set.
    pub fn start(&self) -> Option<GeoPoint> {
        self.start
    }

    /// Goal point, if set.
    pub fn end(&self) -> Option<GeoPoint> {
        self.end
    }

    /// Both endpoints, when both are set.
    pub fn pair(&self) -> Option<Endpoints> {
        self.start.zip(self.end)
    }

    /// Whether both endpoints are set.
    pub fn is_complete(&self) -> bool {
        self.pair().is_some()
    }

    /// Apply a map click according to the current mode.
    pub fn handle_click<S: MapSurface>(
        &mut self,
        point: GeoPoint,
        canvas: &mut Canvas<S>,
    ) -> PairTransition {
        let before = self.pair();

        match self.mode {
            SelectionMode::Start => {
                self.start = Some(point);
                self.mode = SelectionMode::End;
                canvas.place_marker(MarkerId::Start, point);
            }
            SelectionMode::End => {
                self.end = Some(point);
                canvas.place_marker(MarkerId::End, point);
            }
        }

        let transition = PairTransition::between(before, self.pair());
        debug!(point = %point, mode = %self.mode, transition = ?transition, "Point selected");
        transition
    }

    /// Override which endpoint the next click sets.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    /// Exchange start and goal.
    ///
    /// Leaves state untouched and returns an error unless both are set.
    pub fn swap<S: MapSurface>(
        &mut self,
        canvas: &mut Canvas<S>,
    ) -> Result<PairTransition, SelectionError> {
        let (start, end) = self.pair().ok_or(SelectionError::IncompletePair)?;

        self.start = Some(end);
        self.end = Some(start);
        canvas.place_marker(MarkerId::Start, end);
        canvas.place_marker(MarkerId::End, start);

        Ok(PairTransition::between(Some((start, end)), self.pair()))
    }

    /// Clear both endpoints and return to `Start` mode.
    pub fn reset<S: MapSurface>(&mut self, canvas: &mut Canvas<S>) -> PairTransition {
        let before = self.pair();

        self.start = None;
        self.end = None;
        self.mode = SelectionMode::Start;
        canvas.remove_marker(MarkerId::Start);
        canvas.remove_marker(MarkerId::End);

        PairTransition::between(before, None)
    }
}
