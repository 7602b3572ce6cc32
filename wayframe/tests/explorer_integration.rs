//! Integration tests for the explorer event loop.
//!
//! These tests run the loop on a paused tokio clock against a scripted
//! routing service, covering:
//! - Idle → Loading → Success as observed through snapshots
//! - Out-of-order responses (only the latest request wins)
//! - Clearing the pair while a request is outstanding
//! - Autoplay stopping on the last frame
//!
//! Run with: `cargo test --test explorer_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use wayframe::acquisition::AcquisitionState;
use wayframe::explorer::{Explorer, ExplorerEvent, ExplorerLoop, ExplorerSnapshot};
use wayframe::geo::GeoPoint;
use wayframe::playback::PlaybackConfig;
use wayframe::routing::{BoxFuture, RouteCandidate, RouteError, RouteResponse, RoutingService};
use wayframe::surface::{RecordingSurface, SurfaceCommand};

// ============================================================================
// Helpers
// ============================================================================

const START: GeoPoint = GeoPoint::new(52.0, 13.0);
const SLOW_GOAL: GeoPoint = GeoPoint::new(52.0, 13.02);
const FAST_GOAL: GeoPoint = GeoPoint::new(52.0, 13.04);

/// Routing service that answers with a straight five-point line after a
/// delay chosen by destination.
struct ScriptedRouter {
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedRouter {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn delay_for(destination: GeoPoint) -> Duration {
        if destination == SLOW_GOAL {
            Duration::from_millis(400)
        } else {
            Duration::from_millis(50)
        }
    }
}

impl RoutingService for ScriptedRouter {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> BoxFuture<'_, Result<RouteResponse, RouteError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = Self::delay_for(destination);
        let fail = self.fail;

        Box::pin(async move {
            tokio::time::sleep(delay).await;
            if fail {
                return Err(RouteError::NoRoute);
            }
            let geometry: Vec<GeoPoint> = (0..5)
                .map(|i| {
                    let t = i as f64 / 4.0;
                    GeoPoint::new(
                        origin.lat + (destination.lat - origin.lat) * t,
                        origin.lon + (destination.lon - origin.lon) * t,
                    )
                })
                .collect();
            Ok(RouteResponse {
                routes: vec![RouteCandidate {
                    distance_m: origin.distance_to(&destination),
                    duration_s: 120.0,
                    geometry,
                }],
            })
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct Harness {
    events: mpsc::Sender<ExplorerEvent>,
    snapshots: watch::Receiver<ExplorerSnapshot>,
    shutdown: CancellationToken,
    handle: JoinHandle<Explorer<RecordingSurface>>,
}

impl Harness {
    fn start(router: Arc<ScriptedRouter>) -> Self {
        let explorer = Explorer::new(RecordingSurface::new(), PlaybackConfig::default());
        let runner = ExplorerLoop::new(explorer, router, Duration::from_millis(100));
        let snapshots = runner.subscribe();

        let (events, events_rx) = mpsc::channel(16);
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(runner.run(events_rx, shutdown.clone()));

        Self {
            events,
            snapshots,
            shutdown,
            handle,
        }
    }

    async fn send(&self, event: ExplorerEvent) {
        self.events.send(event).await.unwrap();
    }

    async fn wait_for(&mut self, f: impl FnMut(&ExplorerSnapshot) -> bool) -> ExplorerSnapshot {
        tokio::time::timeout(Duration::from_secs(10), self.snapshots.wait_for(f))
            .await
            .expect("timed out waiting for snapshot")
            .unwrap()
            .clone()
    }

    async fn stop(self) -> Explorer<RecordingSurface> {
        self.shutdown.cancel();
        self.handle.await.unwrap()
    }
}

fn polyline_count(explorer: &Explorer<RecordingSurface>) -> usize {
    explorer
        .canvas()
        .surface()
        .commands()
        .iter()
        .filter(|c| matches!(c, SurfaceCommand::DrawPolyline { .. }))
        .count()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_idle_loading_success() {
    let router = ScriptedRouter::ok();
    let mut harness = Harness::start(router.clone());
    assert_eq!(harness.snapshots.borrow().state, AcquisitionState::Idle);

    harness.send(ExplorerEvent::Click(START)).await;
    harness.send(ExplorerEvent::Click(FAST_GOAL)).await;

    harness
        .wait_for(|s| s.state == AcquisitionState::Loading)
        .await;
    let done = harness
        .wait_for(|s| s.state == AcquisitionState::Success)
        .await;

    assert_eq!(done.frame_count, 5);
    assert_eq!(done.current_index, Some(0));
    assert_eq!(done.recently_closed.len(), 1);
    assert_eq!(done.upcoming_open.len(), 4);
    assert_eq!(router.calls(), 1);

    let explorer = harness.stop().await;
    assert!(explorer.canvas().has_route());
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_responses_keep_latest() {
    let router = ScriptedRouter::ok();
    let harness = Harness::start(router.clone());

    harness.send(ExplorerEvent::Click(START)).await;
    harness.send(ExplorerEvent::Click(SLOW_GOAL)).await;
    harness.send(ExplorerEvent::Click(FAST_GOAL)).await;

    // Both fetches finish; the slow one arrives last
    tokio::time::sleep(Duration::from_secs(1)).await;

    let snapshot = harness.snapshots.borrow().clone();
    assert_eq!(snapshot.state, AcquisitionState::Success);
    let summary = snapshot.summary.unwrap();
    assert_eq!(summary.geometry.last(), Some(&FAST_GOAL));
    assert_eq!(router.calls(), 2);

    let explorer = harness.stop().await;
    assert_eq!(polyline_count(&explorer), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reset_during_request_discards_result() {
    let router = ScriptedRouter::ok();
    let harness = Harness::start(router.clone());

    harness.send(ExplorerEvent::Click(START)).await;
    harness.send(ExplorerEvent::Click(SLOW_GOAL)).await;
    harness.send(ExplorerEvent::Reset).await;

    tokio::time::sleep(Duration::from_secs(1)).await;

    let snapshot = harness.snapshots.borrow().clone();
    assert_eq!(snapshot.state, AcquisitionState::Idle);
    assert!(snapshot.summary.is_none());
    assert_eq!(snapshot.frame_count, 0);
    assert!(snapshot.start.is_none());
    assert_eq!(router.calls(), 1);

    let explorer = harness.stop().await;
    assert_eq!(polyline_count(&explorer), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failure_reports_error() {
    let mut harness = Harness::start(ScriptedRouter::failing());

    harness.send(ExplorerEvent::Click(START)).await;
    harness.send(ExplorerEvent::Click(FAST_GOAL)).await;

    let snapshot = harness
        .wait_for(|s| s.state == AcquisitionState::Failed)
        .await;
    assert_eq!(snapshot.error, Some(RouteError::NoRoute));
    assert_eq!(snapshot.frame_count, 0);

    let explorer = harness.stop().await;
    assert!(!explorer.canvas().has_route());
}

#[tokio::test(start_paused = true)]
async fn test_autoplay_stops_at_last_frame() {
    let mut harness = Harness::start(ScriptedRouter::ok());

    harness.send(ExplorerEvent::Click(START)).await;
    harness.send(ExplorerEvent::Click(FAST_GOAL)).await;
    harness
        .wait_for(|s| s.state == AcquisitionState::Success)
        .await;

    harness.send(ExplorerEvent::Play).await;
    let finished = harness.wait_for(|s| s.current_index == Some(4)).await;

    assert!(!finished.playing);
    assert!(finished.upcoming_open.is_empty());

    // No further ticks move past the end
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(harness.snapshots.borrow().current_index, Some(4));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_closing_event_channel_stops_loop() {
    let harness = Harness::start(ScriptedRouter::ok());
    harness.send(ExplorerEvent::Click(START)).await;

    let Harness { events, handle, .. } = harness;
    drop(events);

    let explorer = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop did not stop")
        .unwrap();
    assert_eq!(explorer.selection().start(), Some(START));
}
