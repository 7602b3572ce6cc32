//! Exploration frames derived from route geometry.
//!
//! A route returned by the routing service is already optimal. This module
//! relabels its samples as if they were nodes expanded by an A* search, so
//! that playback can show a cost breakdown per step:
//!
//! - `g`: distance travelled along the route up to the sample
//! - `h`: straight-line distance from the sample to the goal
//! - `f`: `g + h`
//!
//! No search is performed. The frames are a display device only.

use std::ops::Index;

use serde::Serialize;

use crate::geo::{distance, GeoPoint};

/// One annotated sample along the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExplorationFrame {
    /// Position in the sequence (0-based)
    pub index: usize,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Cumulative distance from the route start in meters
    pub g: f64,
    /// Straight-line distance to the goal in meters
    pub h: f64,
    /// Combined score, always `g + h`
    pub f: f64,
}

impl ExplorationFrame {
    /// Location of this frame.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Ordered frames `0..N-1`, built in one pass and never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrameSequence {
    frames: Vec<ExplorationFrame>,
}

impl FrameSequence {
    /// An empty sequence.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&ExplorationFrame> {
        self.frames.get(index)
    }

    /// Last frame, if any.
    pub fn last(&self) -> Option<&ExplorationFrame> {
        self.frames.last()
    }

    /// Iterate frames in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExplorationFrame> {
        self.frames.iter()
    }

    /// Frames as a slice.
    pub fn as_slice(&self) -> &[ExplorationFrame] {
        &self.frames
    }
}

impl Index<usize> for FrameSequence {
    type Output = ExplorationFrame;

    fn index(&self, index: usize) -> &Self::Output {
        &self.frames[index]
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a ExplorationFrame;
    type IntoIter = std::slice::Iter<'a, ExplorationFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Build the frame sequence for a route geometry heading to `goal`.
///
/// Output has one frame per input point; an empty geometry gives an empty
/// sequence.
pub fn build_frames(geometry: &[GeoPoint], goal: GeoPoint) -> FrameSequence {
    let mut frames = Vec::with_capacity(geometry.len());
    let mut g = 0.0;

    for (index, point) in geometry.iter().enumerate() {
        if index > 0 {
            g += distance(geometry[index - 1], *point);
        }
        let h = distance(*point, goal);

        frames.push(ExplorationFrame {
            index,
            lat: point.lat,
            lon: point.lon,
            g,
            h,
            f: g + h,
        });
    }

    FrameSequence { frames }
}
