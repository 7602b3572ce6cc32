//! Core types for routing services.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::geo::GeoPoint;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur while acquiring a route.
///
/// Both variants are recoverable. Neither is retried automatically; a new
/// request is only made when the endpoints change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Transport failure, non-success status, or unreadable response body.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered but offered no route between the points.
    #[error("No route found between the selected points")]
    NoRoute,
}

/// One route offered by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    /// Route length in meters
    pub distance_m: f64,
    /// Expected travel time in seconds
    pub duration_s: f64,
    /// Full route geometry, origin first
    pub geometry: Vec<GeoPoint>,
}

/// All routes returned for a request, best first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteResponse {
    pub routes: Vec<RouteCandidate>,
}

impl RouteResponse {
    /// Take the first (best) route.
    ///
    /// Returns [`RouteError::NoRoute`] when the response has no candidates.
    pub fn into_best(self) -> Result<RouteCandidate, RouteError> {
        self.routes.into_iter().next().ok_or(RouteError::NoRoute)
    }
}

/// A service that computes driving routes between two points.
///
/// Implementations must request the full route geometry. The trait is
/// dyn-compatible so callers can hold an `Arc<dyn RoutingService>`.
pub trait RoutingService: Send + Sync {
    /// Request routes from `origin` to `destination`.
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<RouteResponse, RouteError>>;

    /// Human-readable service name.
    fn name(&self) -> &str;
}

impl<T: RoutingService + ?Sized> RoutingService for std::sync::Arc<T> {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<RouteResponse, RouteError>> {
        (**self).route(origin, destination)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
