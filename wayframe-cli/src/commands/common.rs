//! Common types and utilities shared across CLI commands.

use std::sync::Arc;

use clap::Args;
use console::style;
use wayframe::acquisition::AcquisitionState;
use wayframe::config::{ConfigFile, ConfigKey, RoutingSettings};
use wayframe::explorer::ExplorerSnapshot;
use wayframe::frames::ExplorationFrame;
use wayframe::geo::GeoPoint;
use wayframe::routing::{OsrmRouter, ReqwestClient, RoutingService};

use crate::error::CliError;

/// Routing overrides accepted by commands that fetch routes.
#[derive(Debug, Clone, Default, Args)]
pub struct RouterArgs {
    /// Routing server URL (overrides routing.base_url)
    #[arg(long)]
    pub server: Option<String>,

    /// Routing profile, e.g. driving or foot (overrides routing.profile)
    #[arg(long)]
    pub profile: Option<String>,
}

/// Apply command-line overrides on top of the loaded config.
///
/// Overrides go through the same validation as `config set`.
pub fn apply_overrides(config: &ConfigFile, args: &RouterArgs) -> Result<ConfigFile, CliError> {
    // CLI takes precedence, then config
    let mut config = config.clone();
    if let Some(server) = &args.server {
        ConfigKey::RoutingBaseUrl.set(&mut config, server)?;
    }
    if let Some(profile) = &args.profile {
        ConfigKey::RoutingProfile.set(&mut config, profile)?;
    }
    Ok(config)
}

/// Build the OSRM router described by the routing settings.
pub fn build_router(settings: &RoutingSettings) -> Result<Arc<dyn RoutingService>, CliError> {
    let client = ReqwestClient::with_timeout(settings.timeout_secs)?;
    Ok(Arc::new(OsrmRouter::with_endpoint(
        client,
        settings.base_url.as_str(),
        settings.profile.as_str(),
    )))
}

/// One frame as a table row.
pub fn format_frame(frame: &ExplorationFrame) -> String {
    format!(
        "{:>5}  {:>10.5} {:>11.5}  g={:>9.1}  h={:>9.1}  f={:>9.1}",
        frame.index, frame.lat, frame.lon, frame.g, frame.h, frame.f
    )
}

/// Print a titled list of frames.
pub fn print_frames(title: &str, frames: &[ExplorationFrame]) {
    println!("{}", style(title).bold());
    if frames.is_empty() {
        println!("  (none)");
    }
    for frame in frames {
        println!("  {}", format_frame(frame));
    }
}

/// Print selection, route status and the frame windows.
pub fn print_snapshot(snapshot: &ExplorerSnapshot) {
    let point = |p: Option<GeoPoint>| match p {
        Some(p) => p.to_string(),
        None => "(not set)".to_string(),
    };

    println!("Start:  {}", point(snapshot.start));
    println!("Goal:   {}", point(snapshot.end));
    println!("Mode:   next click sets {}", snapshot.mode);

    let status = snapshot.state.display_status();
    let status = match snapshot.state {
        AcquisitionState::Success => style(status).green(),
        AcquisitionState::Failed => style(status).red(),
        AcquisitionState::Loading => style(status).yellow(),
        AcquisitionState::Idle => style(status).dim(),
    };
    println!("Status: {}", status);

    if let Some(summary) = &snapshot.summary {
        println!("Route:  {}", summary);
    }
    if let Some(error) = &snapshot.error {
        println!("Error:  {}", style(error).red());
    }

    if let Some(index) = snapshot.current_index {
        println!(
            "Frame:  {} / {}{}{}",
            index,
            snapshot.frame_count.saturating_sub(1),
            if snapshot.follow { "  [follow]" } else { "" },
            if snapshot.playing { "  [playing]" } else { "" },
        );
        println!();
        print_frames("Recently closed", &snapshot.recently_closed);
        print_frames("Upcoming open", &snapshot.upcoming_open);
    }
}
