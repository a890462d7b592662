//! # Recom
//!
//! Command-line front end for the Recom distance primitives.
//!
//! ## Usage
//!
//! ```bash
//! recom locations "41.512108,-81.607045" "48.8566,2.3522"
//! recom activities STILL IN_VEHICLE
//! recom song "Barbie Girl"
//! recom songs "Barbie Girl" "Turn Back Time"
//! recom compare '{"timestamp": "...", ...}' '{"timestamp": "...", ...}'
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use recom::cli::{self, Args, Command};
use recom::config::RuntimeConfig;
use recom::geo::Coordinates;
use recom::ingest::TelemetryRow;
use recom::song::{distance_songs, Song};
use recom::user_state::{distance_activities, Activity, distance_locations, distance_user_states};

/// Main entry point for the Recom application.
///
/// Logging goes through `env_logger` and is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug recom compare ...` - construction steps
/// - `RUST_LOG=recom::geo=trace recom locations ...` - computed distances
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    debug!("Parsed arguments: {args:?}");

    match args.command {
        Command::Locations { ref first, ref second } => {
            let meters = distance_locations(first.parse::<Coordinates>()?, second.parse::<Coordinates>()?)?;
            println!("{meters:.3}");
        }
        Command::Activities { ref first, ref second } => {
            println!("{}", distance_activities(first.parse::<Activity>()?, second.parse::<Activity>()?));
        }
        Command::Song { ref query } => {
            let config = runtime_config(&args)?;
            let catalog = config.load_catalog()?;
            info!("Looking up `{query}` in {}", config.catalog_path.display());
            println!("{}", Song::lookup(query, &catalog)?);
        }
        Command::Songs { ref first, ref second } => {
            let config = runtime_config(&args)?;
            let catalog = config.load_catalog()?;
            let gazetteer = config.load_gazetteer()?;
            let first = Song::lookup(first, &catalog)?;
            let second = Song::lookup(second, &catalog)?;
            let distance = distance_songs(&first, &second, &gazetteer)?;
            println!("{}", serde_json::to_string_pretty(&distance)?);
        }
        Command::Compare { ref first, ref second } => {
            let config = runtime_config(&args)?;
            let catalog = config.load_catalog()?;
            let gazetteer = config.load_gazetteer()?;
            let first: TelemetryRow =
                serde_json::from_str(first).context("First sample is not a telemetry JSON object")?;
            let second: TelemetryRow =
                serde_json::from_str(second).context("Second sample is not a telemetry JSON object")?;
            info!("Comparing samples of {} and {}", first.imei, second.imei);
            let first = first.to_user_state(&catalog)?;
            let second = second.to_user_state(&catalog)?;
            let distance = distance_user_states(&first, &second, &gazetteer)?;
            println!("{}", serde_json::to_string_pretty(&distance)?);
        }
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(clap_complete::Shell::from(shell), &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Fixture locations, with command-line/environment overrides applied.
fn runtime_config(args: &Args) -> Result<RuntimeConfig> {
    RuntimeConfig::new()?.with_overrides(args.catalog.as_deref(), args.gazetteer.as_deref())
}
