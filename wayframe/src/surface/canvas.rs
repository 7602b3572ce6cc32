//! Owned marker and route state on top of a [`MapSurface`].

use std::collections::BTreeMap;

use tracing::trace;

use super::{MapSurface, MarkerId, PolylineStyle, FIT_PADDING_PX};
use crate::geo::{GeoBounds, GeoPoint};

/// A map surface plus the resources the explorer has placed on it.
///
/// Markers are keyed by [`MarkerId`]: the first placement draws the marker,
/// later placements move it, and removal releases it. The route polyline is
/// tracked the same way so removal commands are only sent for things that
/// exist.
#[derive(Debug)]
pub struct Canvas<S> {
    surface: S,
    markers: BTreeMap<MarkerId, GeoPoint>,
    route_drawn: bool,
    polyline_style: PolylineStyle,
}

impl<S: MapSurface> Canvas<S> {
    /// Wrap a surface with no markers placed.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            markers: BTreeMap::new(),
            route_drawn: false,
            polyline_style: PolylineStyle::default(),
        }
    }

    /// Use a custom style for the route line.
    pub fn with_polyline_style(mut self, style: PolylineStyle) -> Self {
        self.polyline_style = style;
        self
    }

    /// The wrapped surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the wrapped surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current position of a marker, if placed.
    pub fn marker(&self, id: MarkerId) -> Option<GeoPoint> {
        self.markers.get(&id).copied()
    }

    /// Whether the route polyline is currently drawn.
    pub fn has_route(&self) -> bool {
        self.route_drawn
    }

    /// Place a marker, drawing it on first use and moving it afterwards.
    pub fn place_marker(&mut self, id: MarkerId, point: GeoPoint) {
        match self.markers.insert(id, point) {
            Some(_) => self.surface.move_marker(id, point),
            None => {
                trace!(marker = %id, "Creating marker");
                self.surface.draw_marker(id, point, &id.style());
            }
        }
    }

    /// Remove a marker. Returns `false` if it was not placed.
    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        if self.markers.remove(&id).is_some() {
            self.surface.remove_marker(id);
            true
        } else {
            false
        }
    }

    /// Draw the route line and fit the viewport to it.
    ///
    /// An empty geometry only clears any previous line.
    pub fn draw_route(&mut self, geometry: &[GeoPoint]) {
        let Some(bounds) = GeoBounds::from_points(geometry) else {
            self.clear_route();
            return;
        };

        self.surface.draw_polyline(geometry, &self.polyline_style);
        self.route_drawn = true;
        self.surface.fit_bounds(bounds, FIT_PADDING_PX);
    }

    /// Remove the route line if drawn.
    pub fn clear_route(&mut self) {
        if self.route_drawn {
            self.surface.remove_polyline();
            self.route_drawn = false;
        }
    }

    /// Center the viewport on a point.
    pub fn pan_to(&mut self, point: GeoPoint, animated: bool) {
        self.surface.pan_to(point, animated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceCommand};

    fn canvas() -> Canvas<RecordingSurface> {
        Canvas::new(RecordingSurface::new())
    }

    #[test]
    fn test_first_place_draws_then_moves() {
        let mut canvas = canvas();
        let a = GeoPoint::new(1.0, 1.0);
        let b = GeoPoint::new(2.0, 2.0);

        canvas.place_marker(MarkerId::Exploration, a);
        canvas.place_marker(MarkerId::Exploration, b);

        assert_eq!(
            canvas.surface().commands(),
            &[
                SurfaceCommand::DrawMarker {
                    id: MarkerId::Exploration,
                    point: a,
                    label: None
                },
                SurfaceCommand::MoveMarker {
                    id: MarkerId::Exploration,
                    point: b
                },
            ]
        );
        assert_eq!(canvas.marker(MarkerId::Exploration), Some(b));
    }

    #[test]
    fn test_remove_unplaced_marker_is_silent() {
        let mut canvas = canvas();
        assert!(!canvas.remove_marker(MarkerId::End));
        assert!(canvas.surface().commands().is_empty());
    }

    #[test]
    fn test_remove_then_place_draws_again() {
        let mut canvas = canvas();
        let p = GeoPoint::new(1.0, 1.0);
        canvas.place_marker(MarkerId::Start, p);
        assert!(canvas.remove_marker(MarkerId::Start));
        canvas.place_marker(MarkerId::Start, p);

        let draws = canvas
            .surface()
            .commands()
            .iter()
            .filter(|c| matches!(c, SurfaceCommand::DrawMarker { .. }))
            .count();
        assert_eq!(draws, 2);
    }

    #[test]
    fn test_draw_route_fits_bounds() {
        let mut canvas = canvas();
        let geometry = [GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 2.0)];
        canvas.draw_route(&geometry);

        assert!(canvas.has_route());
        assert_eq!(
            canvas.surface().commands(),
            &[
                SurfaceCommand::DrawPolyline { points: 2 },
                SurfaceCommand::FitBounds {
                    bounds: GeoBounds::new(0.0, 1.0, 0.0, 2.0),
                    padding: FIT_PADDING_PX
                },
            ]
        );
    }

    #[test]
    fn test_clear_route_only_when_drawn() {
        let mut canvas = canvas();
        canvas.clear_route();
        assert!(canvas.surface().commands().is_empty());

        canvas.draw_route(&[GeoPoint::new(0.0, 0.0)]);
        canvas.surface_mut().clear();
        canvas.clear_route();
        canvas.clear_route();
        assert_eq!(
            canvas.surface().commands(),
            &[SurfaceCommand::RemovePolyline]
        );
        assert!(!canvas.has_route());
    }
}
