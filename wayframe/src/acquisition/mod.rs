//! Route acquisition with stale-response rejection.
//!
//! Every request is stamped with a [`RequestToken`]. Only the outstanding
//! request carrying the latest token may change state; anything else that
//! comes back is dropped without touching the route.
//!
//! # State Machine
//!
//! ```text
//! Idle | Success | Failed | Loading --begin--> Loading (token n+1)
//! Loading --resolve(n+1, route)------> Success
//! Loading --resolve(n+1, error)------> Failed
//! Loading --resolve(k != n+1, _)-----> Loading   (stale, ignored)
//! any     --clear--------------------> Idle      (outstanding token invalidated)
//! ```
//!
//! Requests are never aborted at the transport level. A superseded request
//! runs to completion and its result is discarded.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::frames::{build_frames, FrameSequence};
use crate::geo::GeoPoint;
use crate::routing::{RouteError, RouteResponse};

/// Monotonic request stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Acquisition state for the current endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionState {
    /// No complete pair
    #[default]
    Idle,
    /// Waiting for the latest request
    Loading,
    /// Latest request produced a route
    Success,
    /// Latest request failed
    Failed,
}

impl AcquisitionState {
    /// User-facing status text.
    pub fn display_status(&self) -> &'static str {
        match self {
            AcquisitionState::Idle => "Pick start and goal",
            AcquisitionState::Loading => "Loading route...",
            AcquisitionState::Success => "Route ready",
            AcquisitionState::Failed => "Route failed",
        }
    }
}

/// Summary of the acquired route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Route length in meters
    pub distance_m: f64,
    /// Expected travel time in seconds
    pub duration_s: f64,
    /// Full geometry, origin first
    pub geometry: Vec<GeoPoint>,
}

impl RouteSummary {
    /// Route length in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Travel time in whole minutes, rounded.
    pub fn duration_min(&self) -> u64 {
        (self.duration_s / 60.0).round() as u64
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} km, {} min, {} points",
            self.distance_km(),
            self.duration_min(),
            self.geometry.len()
        )
    }
}

/// A request to dispatch to the routing service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Token captured at issue time
    pub token: RequestToken,
    /// Route start
    pub origin: GeoPoint,
    /// Route goal
    pub destination: GeoPoint,
}

/// Outcome of [`RouteAcquisition::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Superseded or cancelled; nothing changed.
    Stale,
    /// A new route was stored; these are its frames.
    Success(FrameSequence),
    /// The latest request failed; any route was cleared.
    Failed(RouteError),
}

/// Owns the route summary and the request ordering.
#[derive(Debug, Default)]
pub struct RouteAcquisition {
    state: AcquisitionState,
    latest: RequestToken,
    in_flight: Option<RouteRequest>,
    summary: Option<RouteSummary>,
    error: Option<RouteError>,
}

impl RouteAcquisition {
    /// Idle controller with no route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// Route summary from the last successful request.
    pub fn summary(&self) -> Option<&RouteSummary> {
        self.summary.as_ref()
    }

    /// Error from the last failed request.
    pub fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }

    /// Most recently issued token.
    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// Request still awaiting a response, if any.
    pub fn in_flight(&self) -> Option<&RouteRequest> {
        self.in_flight.as_ref()
    }

    /// Start a new request for the pair, superseding any outstanding one.
    ///
    /// The previous route stays available until the new request resolves.
    pub fn begin(&mut self, origin: GeoPoint, destination: GeoPoint) -> RouteRequest {
        self.latest = self.latest.next();
        let request = RouteRequest {
            token: self.latest,
            origin,
            destination,
        };

        if let Some(previous) = self.in_flight.replace(request) {
            debug!(
                superseded = %previous.token,
                token = %request.token,
                "Superseding route request"
            );
        }
        self.state = AcquisitionState::Loading;
        self.error = None;

        debug!(
            token = %request.token,
            origin = %origin,
            destination = %destination,
            "Route request issued"
        );
        request
    }

    /// Apply a routing result.
    ///
    /// Results whose token is not the outstanding latest one are discarded.
    /// On success the frames are built with the request's destination as the
    /// goal.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<RouteResponse, RouteError>,
    ) -> Resolution {
        let request = match self.in_flight {
            Some(request) if request.token == token => request,
            _ => {
                debug!(token = %token, latest = %self.latest, "Discarding stale route response");
                return Resolution::Stale;
            }
        };
        self.in_flight = None;

        match result.and_then(RouteResponse::into_best) {
            Ok(route) => {
                let frames = build_frames(&route.geometry, request.destination);
                let summary = RouteSummary {
                    distance_m: route.distance_m,
                    duration_s: route.duration_s,
                    geometry: route.geometry,
                };
                info!(token = %token, route = %summary, "Route acquired");

                self.summary = Some(summary);
                self.error = None;
                self.state = AcquisitionState::Success;
                Resolution::Success(frames)
            }
            Err(error) => {
                warn!(token = %token, error = %error, "Route acquisition failed");

                self.summary = None;
                self.error = Some(error.clone());
                self.state = AcquisitionState::Failed;
                Resolution::Failed(error)
            }
        }
    }

    /// Return to `Idle`, dropping the route and invalidating any outstanding
    /// request. Returns `false` if already idle.
    pub fn clear(&mut self) -> bool {
        let was_idle = self.state == AcquisitionState::Idle;

        if let Some(request) = self.in_flight.take() {
            debug!(token = %request.token, "Invalidating outstanding route request");
        }
        self.summary = None;
        self.error = None;
        self.state = AcquisitionState::Idle;

        !was_idle
    }
}
