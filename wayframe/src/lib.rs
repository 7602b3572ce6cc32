//! Wayframe - Interactive route exploration
//!
//! Pick a start and a goal on a map, fetch a driving route from an
//! OSRM-compatible service, and step through it as a sequence of frames
//! annotated with A*-style costs (`g`, `h`, `f`).
//!
//! The map itself is abstracted behind [`surface::MapSurface`]; routing
//! behind [`routing::RoutingService`]. [`explorer::Explorer`] ties the pieces
//! together and [`explorer::ExplorerLoop`] runs it on tokio.

pub mod acquisition;
pub mod config;
pub mod explorer;
pub mod frames;
pub mod geo;
pub mod logging;
pub mod playback;
pub mod routing;
pub mod selection;
pub mod surface;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
