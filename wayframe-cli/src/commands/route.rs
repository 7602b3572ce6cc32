//! Route command - fetch one route and print its frames.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use wayframe::explorer::{Explorer, ExplorerEvent};
use wayframe::geo::GeoPoint;
use wayframe::surface::RecordingSurface;

use super::common::{self, RouterArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the route command.
pub struct RouteArgs {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub index: Option<usize>,
    pub frames: bool,
    pub json: bool,
    pub router: RouterArgs,
}

/// Run the route command.
pub fn run(args: RouteArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("route");
    let config = common::apply_overrides(runner.config(), &args.router)?;
    let router = common::build_router(&config.routing)?;

    let mut explorer = Explorer::new(RecordingSurface::new(), config.playback.playback_config());
    explorer.handle(ExplorerEvent::Click(args.from));
    let request = explorer
        .handle(ExplorerEvent::Click(args.to))
        .ok_or_else(|| CliError::Input("start and goal did not form a route request".into()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Requesting route from {} ({})",
        router.name(),
        config.routing.base_url
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let runtime = runner.runtime()?;
    let result = runtime.block_on(router.route(request.origin, request.destination));
    spinner.finish_and_clear();

    explorer.apply_route(request.token, result);
    if let Some(error) = explorer.acquisition().error() {
        return Err(CliError::Route(error.clone()));
    }

    if let Some(index) = args.index {
        explorer.handle(ExplorerEvent::SetIndex(index));
    }

    let snapshot = explorer.snapshot();

    if args.json {
        let output = serde_json::json!({
            "route": snapshot.summary,
            "current_index": snapshot.current_index,
            "frames": explorer.playback().frames(),
        });
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::Input(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    common::print_snapshot(&snapshot);
    if args.frames {
        println!();
        common::print_frames("All frames", explorer.playback().frames().as_slice());
    }

    Ok(())
}
