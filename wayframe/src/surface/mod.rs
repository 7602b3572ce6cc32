//! Map surface abstraction
//!
//! The map widget is an external collaborator. This module describes what the
//! explorer needs from it as the [`MapSurface`] trait and keeps the marker
//! bookkeeping on our side of the boundary.
//!
//! # Components
//!
//! - [`MapSurface`] - draw-command sink implemented by a renderer
//! - [`Canvas`] - owns a surface plus the set of markers currently placed on it
//! - [`RecordingSurface`] - records [`SurfaceCommand`]s, used by tests and the CLI
//!
//! ```ignore
//! use wayframe::surface::{Canvas, MarkerId, RecordingSurface};
//!
//! let mut canvas = Canvas::new(RecordingSurface::new());
//! canvas.place_marker(MarkerId::Start, point); // draw
//! canvas.place_marker(MarkerId::Start, other); // move
//! canvas.remove_marker(MarkerId::Start);       // remove
//! ```

mod canvas;
mod recording;

pub use canvas::Canvas;
pub use recording::{RecordingSurface, SurfaceCommand};

use std::fmt;

use crate::geo::{GeoBounds, GeoPoint};

/// Padding in pixels applied when fitting the viewport to a route.
pub const FIT_PADDING_PX: u32 = 40;

/// Logical marker identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerId {
    /// Route origin
    Start,
    /// Route goal
    End,
    /// Current playback position
    Exploration,
}

impl MarkerId {
    /// Default style for this marker.
    pub fn style(&self) -> MarkerStyle {
        match self {
            MarkerId::Start => MarkerStyle {
                label: Some("S"),
                color: "#2e7d32",
                radius: 8,
            },
            MarkerId::End => MarkerStyle {
                label: Some("G"),
                color: "#c62828",
                radius: 8,
            },
            MarkerId::Exploration => MarkerStyle {
                label: None,
                color: "#1565c0",
                radius: 6,
            },
        }
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkerId::Start => "start",
            MarkerId::End => "end",
            MarkerId::Exploration => "exploration",
        };
        f.write_str(name)
    }
}

/// Visual style of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Short text drawn on the marker
    pub label: Option<&'static str>,
    /// CSS-style color
    pub color: &'static str,
    /// Radius in pixels
    pub radius: u32,
}

/// Visual style of the route polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineStyle {
    /// CSS-style color
    pub color: &'static str,
    /// Line width in pixels
    pub weight: u32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            color: "#1565c0",
            weight: 4,
            opacity: 0.8,
        }
    }
}

/// Draw-command sink for a map renderer.
///
/// Implementations receive commands in the order the explorer issues them.
/// Marker lifecycle is tracked by [`Canvas`], so `move_marker` and
/// `remove_marker` are only called for markers that were drawn.
pub trait MapSurface {
    /// Create a marker.
    fn draw_marker(&mut self, id: MarkerId, point: GeoPoint, style: &MarkerStyle);

    /// Reposition an existing marker.
    fn move_marker(&mut self, id: MarkerId, point: GeoPoint);

    /// Remove an existing marker.
    fn remove_marker(&mut self, id: MarkerId);

    /// Draw the route line, replacing any previous one.
    fn draw_polyline(&mut self, geometry: &[GeoPoint], style: &PolylineStyle);

    /// Remove the route line.
    fn remove_polyline(&mut self);

    /// Fit the viewport to a bounding box.
    fn fit_bounds(&mut self, bounds: GeoBounds, padding: u32);

    /// Center the viewport on a point.
    fn pan_to(&mut self, point: GeoPoint, animated: bool);
}

impl<T: MapSurface + ?Sized> MapSurface for Box<T> {
    fn draw_marker(&mut self, id: MarkerId, point: GeoPoint, style: &MarkerStyle) {
        (**self).draw_marker(id, point, style)
    }

    fn move_marker(&mut self, id: MarkerId, point: GeoPoint) {
        (**self).move_marker(id, point)
    }

    fn remove_marker(&mut self, id: MarkerId) {
        (**self).remove_marker(id)
    }

    fn draw_polyline(&mut self, geometry: &[GeoPoint], style: &PolylineStyle) {
        (**self).draw_polyline(geometry, style)
    }

    fn remove_polyline(&mut self) {
        (**self).remove_polyline()
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding: u32) {
        (**self).fit_bounds(bounds, padding)
    }

    fn pan_to(&mut self, point: GeoPoint, animated: bool) {
        (**self).pan_to(point, animated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_labels() {
        assert_eq!(MarkerId::Start.style().label, Some("S"));
        assert_eq!(MarkerId::End.style().label, Some("G"));
        assert_eq!(MarkerId::Exploration.style().label, None);
    }

    #[test]
    fn test_marker_display() {
        assert_eq!(MarkerId::Start.to_string(), "start");
        assert_eq!(MarkerId::Exploration.to_string(), "exploration");
    }

    #[test]
    fn test_boxed_surface_forwards() {
        let mut boxed: Box<RecordingSurface> = Box::new(RecordingSurface::new());
        boxed.pan_to(GeoPoint::new(1.0, 2.0), true);
        assert_eq!(
            boxed.commands(),
            &[SurfaceCommand::PanTo {
                point: GeoPoint::new(1.0, 2.0),
                animated: true
            }]
        );
    }
}
