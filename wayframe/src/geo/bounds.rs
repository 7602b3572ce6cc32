//! Bounding boxes over point sequences.

use super::GeoPoint;

/// Geographic bounding box.
///
/// Represents the minimum bounding rectangle containing a set of points.
/// Does not handle geometries that cross the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude
    pub min_lat: f64,
    /// Maximum (northernmost) latitude
    pub max_lat: f64,
    /// Minimum (westernmost) longitude
    pub min_lon: f64,
    /// Maximum (easternmost) longitude
    pub max_lon: f64,
}

impl GeoBounds {
    /// Create a new bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Compute the bounds of a sequence of points.
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = Self::new(first.lat, first.lat, first.lon, first.lon);

        Some(iter.fold(init, |b, p| Self {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lon: b.min_lon.min(p.lon),
            max_lon: b.max_lon.max(p.lon),
        }))
    }

    /// Check if a point lies within these bounds (inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }

    /// Get the center point of the box.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_empty_sequence() {
        let points: Vec<GeoPoint> = Vec::new();
        assert!(GeoBounds::from_points(&points).is_none());
    }

    #[test]
    fn test_bounds_of_single_point() {
        let points = [GeoPoint::new(53.5, 10.0)];
        let bounds = GeoBounds::from_points(&points).unwrap();
        assert_eq!(bounds, GeoBounds::new(53.5, 53.5, 10.0, 10.0));
    }

    #[test]
    fn test_bounds_cover_all_points() {
        let points = [
            GeoPoint::new(53.5, 10.0),
            GeoPoint::new(53.7, 9.8),
            GeoPoint::new(53.4, 10.3),
        ];
        let bounds = GeoBounds::from_points(&points).unwrap();

        assert_eq!(bounds.min_lat, 53.4);
        assert_eq!(bounds.max_lat, 53.7);
        assert_eq!(bounds.min_lon, 9.8);
        assert_eq!(bounds.max_lon, 10.3);
        assert!(points.iter().all(|p| bounds.contains(p)));
    }

    #[test]
    fn test_center() {
        let bounds = GeoBounds::new(50.0, 52.0, 8.0, 12.0);
        assert_eq!(bounds.center(), GeoPoint::new(51.0, 10.0));
    }
}
