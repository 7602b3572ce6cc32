//! OSRM-compatible routing service.
//!
//! Talks to the OSRM HTTP API (the public demo server or a self-hosted
//! instance). Any backend that answers the same route endpoint works.
//!
//! # API Endpoint
//!
//! `{base}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=full&geometries=geojson`
//!
//! `overview=full` asks for the complete geometry instead of a simplified
//! one, and `geometries=geojson` returns it as `[lon, lat]` pairs.

use serde::Deserialize;
use tracing::{debug, warn};

use super::http::{AsyncHttpClient, HttpResponse};
use super::types::{BoxFuture, RouteCandidate, RouteError, RouteResponse, RoutingService};
use crate::geo::GeoPoint;

/// Public OSRM demo server.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

/// Default routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Routing service backed by an OSRM server.
///
/// # Example
///
/// ```no_run
/// use wayframe::routing::{OsrmRouter, ReqwestClient};
///
/// let client = ReqwestClient::new().unwrap();
/// let router = OsrmRouter::new(client);
/// // Hand the router to an ExplorerLoop...
/// ```
pub struct OsrmRouter<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    profile: String,
}

impl<C: AsyncHttpClient> OsrmRouter<C> {
    /// Creates a router against the public demo server with the driving profile.
    pub fn new(http_client: C) -> Self {
        Self::with_endpoint(http_client, DEFAULT_OSRM_URL, DEFAULT_PROFILE)
    }

    /// Creates a router against a custom server and profile.
    pub fn with_endpoint(
        http_client: C,
        base_url: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
            profile: profile.into(),
        }
    }

    /// Builds the route URL. OSRM expects `lon,lat` order.
    fn build_url(&self, origin: GeoPoint, destination: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson",
            self.base_url,
            self.profile,
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        )
    }
}

/// Parse an OSRM route response body.
///
/// Routes without geometry are dropped; a body with no usable route is
/// [`RouteError::NoRoute`]. A body that is not OSRM JSON is a network error.
fn parse_response(body: &[u8]) -> Result<RouteResponse, RouteError> {
    let parsed: OsrmResponse = serde_json::from_slice(body)
        .map_err(|e| RouteError::Network(format!("Invalid route response: {}", e)))?;

    if let Some(code) = parsed.code.as_deref() {
        if code != "Ok" {
            debug!(code, "Routing service reported no route");
        }
    }

    let routes: Vec<RouteCandidate> = parsed
        .routes
        .into_iter()
        .filter(|r| !r.geometry.coordinates.is_empty())
        .map(|r| RouteCandidate {
            distance_m: r.distance,
            duration_s: r.duration,
            geometry: r
                .geometry
                .coordinates
                .into_iter()
                .map(|[lon, lat]| GeoPoint::new(lat, lon))
                .collect(),
        })
        .collect();

    if routes.is_empty() {
        return Err(RouteError::NoRoute);
    }

    Ok(RouteResponse { routes })
}

/// Map a non-2xx response to an error.
///
/// OSRM answers an unroutable pair with HTTP 400 and a JSON `code` of
/// `NoRoute` or `NoSegment`; those mean no route exists. Everything else is
/// a network error.
fn status_error(response: &HttpResponse, url: &str) -> RouteError {
    let code = serde_json::from_slice::<OsrmResponse>(&response.body)
        .ok()
        .and_then(|parsed| parsed.code);

    match code.as_deref() {
        Some(code @ ("NoRoute" | "NoSegment")) => {
            debug!(status = response.status, code, "Routing service found no route");
            RouteError::NoRoute
        }
        _ => {
            warn!(status = response.status, url = %url, "Route request rejected");
            RouteError::Network(format!("HTTP {} from {}", response.status, url))
        }
    }
}

impl<C: AsyncHttpClient> RoutingService for OsrmRouter<C> {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<RouteResponse, RouteError>> {
        let url = self.build_url(origin, destination);
        Box::pin(async move {
            debug!(url = %url, "Requesting route");
            let response = self.http_client.get(&url).await.map_err(|e| {
                warn!(error = %e, "Route request failed");
                e
            })?;
            if !response.is_success() {
                return Err(status_error(&response, &url));
            }
            parse_response(&response.body)
        })
    }

    fn name(&self) -> &str {
        "OSRM"
    }
}
