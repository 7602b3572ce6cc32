//! Tokio event loop around an [`Explorer`].
//!
//! ```text
//!  ExplorerEvent ──► ┌──────────────┐ ──► RouteRequest ──► spawned fetch
//!                    │   Explorer   │                          │
//!  route result  ──► │ (one owner)  │ ◄── token + result ◄─────┘
//!                    └──────┬───────┘
//!  autoplay tick ──►        │
//!                           ▼
//!                  watch::Sender<ExplorerSnapshot>
//! ```
//!
//! Reactions run one at a time on the loop task. Fetches are the only work
//! done elsewhere; their results re-enter through an internal channel and
//! go through the same token check as everything else.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{Explorer, ExplorerEvent, ExplorerSnapshot};
use crate::acquisition::{RequestToken, RouteRequest};
use crate::routing::{RouteError, RouteResponse, RoutingService};
use crate::surface::MapSurface;

/// Default delay between autoplay steps.
pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(250);

struct FetchOutcome {
    token: RequestToken,
    result: Result<RouteResponse, RouteError>,
}

/// Runs an [`Explorer`] until shutdown.
///
/// # Example
///
/// ```ignore
/// let explorer = Explorer::new(surface, PlaybackConfig::default());
/// let runner = ExplorerLoop::new(explorer, router, DEFAULT_AUTOPLAY_INTERVAL);
/// let mut snapshots = runner.subscribe();
///
/// let (events_tx, events_rx) = mpsc::channel(32);
/// let shutdown = CancellationToken::new();
/// let handle = tokio::spawn(runner.run(events_rx, shutdown.clone()));
///
/// events_tx.send(ExplorerEvent::Click(start)).await?;
/// events_tx.send(ExplorerEvent::Click(goal)).await?;
/// snapshots.wait_for(|s| s.state != AcquisitionState::Loading).await?;
/// ```
pub struct ExplorerLoop<S> {
    explorer: Explorer<S>,
    router: Arc<dyn RoutingService>,
    autoplay_interval: Duration,
    snapshot_tx: watch::Sender<ExplorerSnapshot>,
    results_tx: mpsc::UnboundedSender<FetchOutcome>,
    results_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<S: MapSurface> ExplorerLoop<S> {
    pub fn new(
        explorer: Explorer<S>,
        router: Arc<dyn RoutingService>,
        autoplay_interval: Duration,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(explorer.snapshot());
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            explorer,
            router,
            autoplay_interval,
            snapshot_tx,
            results_tx,
            results_rx,
        }
    }

    /// Receiver that sees a fresh snapshot after every reaction.
    pub fn subscribe(&self) -> watch::Receiver<ExplorerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Process events until `shutdown` fires or the event channel closes.
    ///
    /// Returns the explorer so callers can inspect its final state.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<ExplorerEvent>,
        shutdown: CancellationToken,
    ) -> Explorer<S> {
        info!(router = self.router.name(), "Explorer loop starting");

        let mut ticker = tokio::time::interval(self.autoplay_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let playing = self.explorer.playback().is_playing();

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Explorer loop shutting down");
                    break;
                }

                Some(outcome) = self.results_rx.recv() => {
                    self.explorer.apply_route(outcome.token, outcome.result);
                }

                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("Event channel closed");
                        break;
                    };
                    if let Some(request) = self.explorer.handle(event) {
                        self.dispatch(request);
                    }
                    if !playing && self.explorer.playback().is_playing() {
                        ticker.reset();
                    }
                }

                _ = ticker.tick(), if playing => {
                    self.explorer.tick();
                }
            }

            self.snapshot_tx.send_replace(self.explorer.snapshot());
        }

        info!("Explorer loop stopped");
        self.explorer
    }

    fn dispatch(&self, request: RouteRequest) {
        let router = Arc::clone(&self.router);
        let results_tx = self.results_tx.clone();

        tokio::spawn(async move {
            let result = router.route(request.origin, request.destination).await;
            debug!(token = %request.token, ok = result.is_ok(), "Route fetch finished");
            // The loop may already be gone
            let _ = results_tx.send(FetchOutcome {
                token: request.token,
                result,
            });
        });
    }
}
