//! Geographic primitives
//!
//! Provides the [`GeoPoint`] value type, great-circle distance between two
//! points, and the [`GeoBounds`] box used to fit a viewport around a route.

mod bounds;

pub use bounds::GeoBounds;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic coordinate in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (positive north)
    pub lat: f64,
    /// Longitude in degrees (positive east)
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another point in meters.
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance(*self, *other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Errors produced when parsing a `"lat,lon"` pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoParseError {
    /// Input did not contain exactly two comma-separated values.
    #[error("expected 'lat,lon', got '{0}'")]
    Format(String),

    /// One of the components was not a number.
    #[error("invalid coordinate '{0}'")]
    Number(String),
}

impl FromStr for GeoPoint {
    type Err = GeoParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => (lat.trim(), lon.trim()),
            _ => return Err(GeoParseError::Format(s.to_string())),
        };

        let lat: f64 = lat
            .parse()
            .map_err(|_| GeoParseError::Number(lat.to_string()))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| GeoParseError::Number(lon.to_string()))?;

        Ok(Self { lat, lon })
    }
}

/// Great-circle distance between two points in meters.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_M`].
/// Symmetric, non-negative, and zero for identical points.
#[inline]
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).abs().to_radians();
    let d_lambda = (b.lon - a.lon).abs().to_radians();

    let s = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push s a hair outside [0, 1] for antipodal points
    let s = s.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * s.sqrt().atan2((1.0 - s).sqrt())
}
