//! Wayframe CLI - Command-line interface
//!
//! Fetches driving routes and replays them frame by frame, either once
//! (`route`) or in an interactive session (`explore`).

mod commands;
mod error;
mod runner;
mod surface;

use clap::{Parser, Subcommand};
use console::style;
use wayframe::geo::GeoPoint;

use commands::common::RouterArgs;
use commands::config::ConfigCommands;
use commands::{config, explore, route};
use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "wayframe",
    version,
    about = "Replay driving routes as step-by-step search expansions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a route and print its exploration frames
    Route {
        /// Start point as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        from: GeoPoint,

        /// Goal point as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        to: GeoPoint,

        /// Frame to center the windows on (clamped)
        #[arg(long)]
        index: Option<usize>,

        /// Print every frame
        #[arg(long)]
        frames: bool,

        /// Print the route and frames as JSON
        #[arg(long, conflicts_with = "frames")]
        json: bool,

        #[command(flatten)]
        router: RouterArgs,
    },

    /// Interactive session: pick points, load routes, step through frames
    Explore {
        /// Start with viewport follow enabled
        #[arg(long)]
        follow: bool,

        /// Do not print map commands
        #[arg(long)]
        no_map: bool,

        #[command(flatten)]
        router: RouterArgs,
    },

    /// View or edit configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Route {
            from,
            to,
            index,
            frames,
            json,
            router,
        } => route::run(route::RouteArgs {
            from,
            to,
            index,
            frames,
            json,
            router,
        }),
        Commands::Explore {
            follow,
            no_map,
            router,
        } => explore::run(explore::ExploreArgs {
            follow,
            no_map,
            router,
        }),
        Commands::Config { command } => config::run(command),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
