mod cafes;
mod location;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use kafe_core::JsonFileLocationStore;
use kafe_osm::CafeFinder;
use tracing_subscriber::EnvFilter;

use crate::cafes::NearbyArgs;
use crate::location::LocationCommands;

#[derive(Debug, Parser)]
#[command(name = "kafe")]
#[command(about = "Find cafes near a location using OpenStreetMap data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List cafes around a point, or matching a keyword
    Nearby(NearbyArgs),
    /// Show full details for one venue
    Detail {
        /// Venue id, e.g. N123456 or mock-1
        id: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show or change the saved search origin
    Location {
        #[command(subcommand)]
        command: LocationCommands,
    },
    /// Read keywords from stdin and search as you type; only the latest
    /// completed search is printed
    Browse {
        /// Search radius in metres for blank lines
        #[arg(long)]
        radius: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = kafe_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = JsonFileLocationStore::in_dir(&config.data_dir);
    let finder = Arc::new(CafeFinder::from_config(&config)?);

    match cli.command {
        Commands::Nearby(args) => {
            cafes::run_nearby(&finder, &store, &args, config.default_radius_m).await
        }
        Commands::Detail { id, json } => cafes::run_detail(&finder, &id, json).await,
        Commands::Location { command } => {
            location::run_location(finder.nominatim(), &store, command).await
        }
        Commands::Browse { radius } => {
            let origin = kafe_core::load_or_default(&store);
            cafes::run_browse(finder, origin, radius.unwrap_or(config.default_radius_m)).await
        }
    }
}

#[cfg(test)]
mod tests;
