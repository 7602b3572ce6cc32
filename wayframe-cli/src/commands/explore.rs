//! Explore command - interactive route exploration on the terminal.
//!
//! Reads one command per line from stdin and feeds it to an
//! [`ExplorerLoop`]. Map commands are printed by [`ConsoleSurface`]; status
//! changes (route loaded, frame moved) are printed as they happen.

use std::sync::Arc;
use std::time::Duration;

use console::style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use wayframe::acquisition::AcquisitionState;
use wayframe::explorer::{Explorer, ExplorerEvent, ExplorerLoop, ExplorerSnapshot};
use wayframe::geo::GeoPoint;
use wayframe::playback::PlaybackController;
use wayframe::routing::RoutingService;
use wayframe::selection::SelectionMode;
use wayframe::surface::{Canvas, MapSurface};

use super::common::{self, RouterArgs};
use crate::error::CliError;
use crate::runner::CliRunner;
use crate::surface::ConsoleSurface;

/// Arguments for the explore command.
pub struct ExploreArgs {
    pub follow: bool,
    pub no_map: bool,
    pub router: RouterArgs,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Event(ExplorerEvent),
    Show,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  click LAT LON     set the start or goal (depending on mode)
  mode start|end    choose which endpoint the next click sets
  swap              exchange start and goal
  reset             clear both endpoints
  index N           jump to frame N
  next / prev       step one frame
  follow            toggle viewport follow
  play / pause      autoplay through the frames
  show              print the current state
  help              this text
  quit              leave";

/// Run the explore command.
pub fn run(args: ExploreArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("explore");
    let config = common::apply_overrides(runner.config(), &args.router)?;
    let router = common::build_router(&config.routing)?;

    let surface = if args.no_map {
        ConsoleSurface::quiet()
    } else {
        ConsoleSurface::new()
    };
    let playback = PlaybackController::new(config.playback.playback_config())
        .with_follow(args.follow || config.playback.follow);
    let explorer = Explorer::with_canvas(Canvas::new(surface), playback);

    let runtime = runner.runtime()?;
    let result = runtime.block_on(session(
        explorer,
        router,
        config.playback.autoplay_interval(),
    ));
    // A pending stdin read would otherwise block runtime drop
    runtime.shutdown_background();
    result
}

async fn session(
    explorer: Explorer<ConsoleSurface>,
    router: Arc<dyn RoutingService>,
    autoplay_interval: Duration,
) -> Result<(), CliError> {
    let explorer_loop = ExplorerLoop::new(explorer, router, autoplay_interval);
    let shutdown = CancellationToken::new();

    let ctrlc_shutdown = shutdown.clone();
    ctrlc::set_handler(move || ctrlc_shutdown.cancel())
        .map_err(|e| CliError::Runtime(format!("Failed to install Ctrl-C handler: {}", e)))?;

    println!("{}", style("wayframe explore").bold());
    println!("{}", HELP);

    drive(explorer_loop, BufReader::new(tokio::io::stdin()), shutdown).await
}

/// Feed input lines to the loop until quit, end of input, a read error or
/// shutdown. The loop and reporter are always cancelled and joined before
/// returning; a read error is returned afterwards.
async fn drive<S, R>(
    explorer_loop: ExplorerLoop<S>,
    input: R,
    shutdown: CancellationToken,
) -> Result<(), CliError>
where
    S: MapSurface + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
{
    let snapshots = explorer_loop.subscribe();
    let (events_tx, events_rx) = mpsc::channel(32);

    let loop_handle = tokio::spawn(explorer_loop.run(events_rx, shutdown.clone()));
    let report_handle = tokio::spawn(report_changes(snapshots.clone(), shutdown.clone()));

    let mut lines = input.lines();
    let mut read_error = None;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("stdin closed");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read input");
                        read_error = Some(e);
                        break;
                    }
                };
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(ReplCommand::Quit)) => break,
                    Ok(Some(ReplCommand::Help)) => println!("{}", HELP),
                    Ok(Some(ReplCommand::Show)) => common::print_snapshot(&snapshots.borrow()),
                    Ok(Some(ReplCommand::Event(event))) => {
                        if events_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(msg) => eprintln!("{} {}", style("?").yellow(), msg),
                }
            }
        }
    }

    shutdown.cancel();
    let _ = loop_handle.await;
    let _ = report_handle.await;

    match read_error {
        Some(e) => Err(CliError::Io(e)),
        None => Ok(()),
    }
}

/// Print route status transitions and frame moves as they are published.
async fn report_changes(
    mut snapshots: watch::Receiver<ExplorerSnapshot>,
    shutdown: CancellationToken,
) {
    let mut last = snapshots.borrow().clone();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = snapshots.borrow_and_update().clone();
                report(&last, &current);
                last = current;
            }
        }
    }
}

fn report(last: &ExplorerSnapshot, current: &ExplorerSnapshot) {
    if current.state != last.state {
        match current.state {
            AcquisitionState::Loading => println!("{}", style("Loading route...").yellow()),
            AcquisitionState::Success => {
                if let Some(summary) = &current.summary {
                    println!("{} {}", style("Route ready:").green(), summary);
                }
            }
            AcquisitionState::Failed => {
                if let Some(error) = &current.error {
                    println!("{} {}", style("Route failed:").red(), error);
                }
            }
            AcquisitionState::Idle => println!("{}", style("Selection cleared").dim()),
        }
    }

    if current.current_index != last.current_index || current.summary != last.summary {
        if let Some(frame) = &current.current_frame {
            println!("  {}", common::format_frame(frame));
        }
    }

    if current.playing != last.playing {
        let text = if current.playing { "Playing" } else { "Paused" };
        println!("{}", style(text).dim());
    }
    if current.follow != last.follow {
        let text = if current.follow { "Follow on" } else { "Follow off" };
        println!("{}", style(text).dim());
    }
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();

    let command = match command.to_ascii_lowercase().as_str() {
        "click" | "c" => ReplCommand::Event(ExplorerEvent::Click(parse_point(&rest)?)),
        "mode" | "m" => {
            let mode: SelectionMode = rest
                .first()
                .ok_or("usage: mode start|end")?
                .parse()
                .map_err(|e: wayframe::selection::SelectionError| e.to_string())?;
            ReplCommand::Event(ExplorerEvent::SetMode(mode))
        }
        "swap" => ReplCommand::Event(ExplorerEvent::Swap),
        "reset" => ReplCommand::Event(ExplorerEvent::Reset),
        "index" | "i" => {
            let index = rest
                .first()
                .ok_or("usage: index N")?
                .parse::<usize>()
                .map_err(|_| "frame index must be a non-negative integer".to_string())?;
            ReplCommand::Event(ExplorerEvent::SetIndex(index))
        }
        "next" | "n" => ReplCommand::Event(ExplorerEvent::StepForward),
        "prev" | "p" => ReplCommand::Event(ExplorerEvent::StepBack),
        "follow" | "f" => ReplCommand::Event(ExplorerEvent::ToggleFollow),
        "play" => ReplCommand::Event(ExplorerEvent::Play),
        "pause" => ReplCommand::Event(ExplorerEvent::Pause),
        "show" | "s" => ReplCommand::Show,
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };

    Ok(Some(command))
}

/// Accepts `LAT LON`, `LAT,LON` or `LAT, LON`.
fn parse_point(args: &[&str]) -> Result<GeoPoint, String> {
    let joined = args.join(" ").replace(',', " ");
    let numbers: Vec<&str> = joined.split_whitespace().collect();
    let [lat, lon] = numbers.as_slice() else {
        return Err("usage: click LAT LON".to_string());
    };

    let point: GeoPoint = format!("{},{}", lat, lon)
        .parse()
        .map_err(|e: wayframe::geo::GeoParseError| e.to_string())?;

    if !(-90.0..=90.0).contains(&point.lat) {
        return Err(format!("latitude {} out of range", point.lat));
    }
    if !(-180.0..=180.0).contains(&point.lon) {
        return Err(format!("longitude {} out of range", point.lon));
    }
    Ok(point)
}
