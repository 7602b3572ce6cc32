//! Surface that records every command it receives.

use std::fmt;

use super::{MapSurface, MarkerId, MarkerStyle, PolylineStyle};
use crate::geo::{GeoBounds, GeoPoint};

/// A draw command as received by a [`MapSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    DrawMarker {
        id: MarkerId,
        point: GeoPoint,
        label: Option<&'static str>,
    },
    MoveMarker {
        id: MarkerId,
        point: GeoPoint,
    },
    RemoveMarker {
        id: MarkerId,
    },
    DrawPolyline {
        points: usize,
    },
    RemovePolyline,
    FitBounds {
        bounds: GeoBounds,
        padding: u32,
    },
    PanTo {
        point: GeoPoint,
        animated: bool,
    },
}

impl fmt::Display for SurfaceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceCommand::DrawMarker { id, point, label } => match label {
                Some(label) => write!(f, "draw marker {} [{}] at {}", id, label, point),
                None => write!(f, "draw marker {} at {}", id, point),
            },
            SurfaceCommand::MoveMarker { id, point } => {
                write!(f, "move marker {} to {}", id, point)
            }
            SurfaceCommand::RemoveMarker { id } => write!(f, "remove marker {}", id),
            SurfaceCommand::DrawPolyline { points } => {
                write!(f, "draw route polyline ({} points)", points)
            }
            SurfaceCommand::RemovePolyline => write!(f, "remove route polyline"),
            SurfaceCommand::FitBounds { bounds, padding } => write!(
                f,
                "fit bounds [{:.5},{:.5}]..[{:.5},{:.5}] padding {}px",
                bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon, padding
            ),
            SurfaceCommand::PanTo { point, animated } => {
                if *animated {
                    write!(f, "pan to {} (animated)", point)
                } else {
                    write!(f, "pan to {}", point)
                }
            }
        }
    }
}

/// In-memory surface that keeps a log of commands.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands received so far, oldest first.
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Remove and return the recorded commands.
    pub fn take(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forget recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl MapSurface for RecordingSurface {
    fn draw_marker(&mut self, id: MarkerId, point: GeoPoint, style: &MarkerStyle) {
        self.commands.push(SurfaceCommand::DrawMarker {
            id,
            point,
            label: style.label,
        });
    }

    fn move_marker(&mut self, id: MarkerId, point: GeoPoint) {
        self.commands.push(SurfaceCommand::MoveMarker { id, point });
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.commands.push(SurfaceCommand::RemoveMarker { id });
    }

    fn draw_polyline(&mut self, geometry: &[GeoPoint], _style: &PolylineStyle) {
        self.commands.push(SurfaceCommand::DrawPolyline {
            points: geometry.len(),
        });
    }

    fn remove_polyline(&mut self) {
        self.commands.push(SurfaceCommand::RemovePolyline);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding: u32) {
        self.commands.push(SurfaceCommand::FitBounds { bounds, padding });
    }

    fn pan_to(&mut self, point: GeoPoint, animated: bool) {
        self.commands.push(SurfaceCommand::PanTo { point, animated });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new();
        let p = GeoPoint::new(1.0, 2.0);
        surface.draw_marker(MarkerId::Start, p, &MarkerId::Start.style());
        surface.move_marker(MarkerId::Start, p);
        surface.remove_marker(MarkerId::Start);

        assert_eq!(
            surface.commands(),
            &[
                SurfaceCommand::DrawMarker {
                    id: MarkerId::Start,
                    point: p,
                    label: Some("S")
                },
                SurfaceCommand::MoveMarker {
                    id: MarkerId::Start,
                    point: p
                },
                SurfaceCommand::RemoveMarker {
                    id: MarkerId::Start
                },
            ]
        );
    }

    #[test]
    fn test_take_drains() {
        let mut surface = RecordingSurface::new();
        surface.remove_polyline();
        assert_eq!(surface.take(), vec![SurfaceCommand::RemovePolyline]);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_display() {
        let cmd = SurfaceCommand::DrawMarker {
            id: MarkerId::End,
            point: GeoPoint::new(1.0, 2.0),
            label: Some("G"),
        };
        assert_eq!(cmd.to_string(), "draw marker end [G] at 1.000000,2.000000");
        assert_eq!(
            SurfaceCommand::DrawPolyline { points: 12 }.to_string(),
            "draw route polyline (12 points)"
        );
    }
}
