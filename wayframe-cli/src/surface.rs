//! Terminal map surface.

use console::style;
use wayframe::geo::{GeoBounds, GeoPoint};
use wayframe::surface::{MapSurface, MarkerId, MarkerStyle, PolylineStyle, SurfaceCommand};

/// Prints every map command as one line.
///
/// Stands in for a graphical map: the explorer drives it exactly as it
/// would drive a real one.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    quiet: bool,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swallow all output.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    fn emit(&self, command: SurfaceCommand) {
        if self.quiet {
            return;
        }
        let line = command.to_string();
        let line = match command {
            SurfaceCommand::DrawMarker { .. } | SurfaceCommand::DrawPolyline { .. } => {
                style(line).green()
            }
            SurfaceCommand::RemoveMarker { .. } | SurfaceCommand::RemovePolyline => {
                style(line).red()
            }
            _ => style(line).cyan(),
        };
        println!("  {} {}", style("map").dim(), line);
    }
}

impl MapSurface for ConsoleSurface {
    fn draw_marker(&mut self, id: MarkerId, point: GeoPoint, style: &MarkerStyle) {
        self.emit(SurfaceCommand::DrawMarker {
            id,
            point,
            label: style.label,
        });
    }

    fn move_marker(&mut self, id: MarkerId, point: GeoPoint) {
        self.emit(SurfaceCommand::MoveMarker { id, point });
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.emit(SurfaceCommand::RemoveMarker { id });
    }

    fn draw_polyline(&mut self, geometry: &[GeoPoint], _style: &PolylineStyle) {
        self.emit(SurfaceCommand::DrawPolyline {
            points: geometry.len(),
        });
    }

    fn remove_polyline(&mut self) {
        self.emit(SurfaceCommand::RemovePolyline);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding: u32) {
        self.emit(SurfaceCommand::FitBounds { bounds, padding });
    }

    fn pan_to(&mut self, point: GeoPoint, animated: bool) {
        self.emit(SurfaceCommand::PanTo { point, animated });
    }
}
