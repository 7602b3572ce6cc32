//! Routing service abstraction
//!
//! This module provides the trait the explorer uses to obtain driving routes
//! and an implementation for OSRM-compatible servers.
//!
//! ```ignore
//! use wayframe::routing::{OsrmRouter, ReqwestClient, RoutingService};
//!
//! let router = OsrmRouter::new(ReqwestClient::new()?);
//! let response = router.route(origin, destination).await?;
//! let best = response.into_best()?;
//! ```

mod http;
mod osrm;
mod types;

pub use http::{AsyncHttpClient, HttpResponse, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use osrm::{OsrmRouter, DEFAULT_OSRM_URL, DEFAULT_PROFILE};
pub use types::{BoxFuture, RouteCandidate, RouteError, RouteResponse, RoutingService};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
