//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `recom` binary.
//!
//! ## Commands
//!
//! - `locations`: Geodesic distance between two `lat,lon` pairs
//! - `activities`: Intensity change between two activities
//! - `song`: Look a song up in the catalog and print its details
//! - `songs`: Attribute distances between two songs
//! - `compare`: Distances between two telemetry samples
//! - `completion`: Shell completion script
//!
//! ## Examples
//!
//! ```bash
//! recom locations "41.512108,-81.607045" "48.8566,2.3522"
//! recom activities STILL ON_BICYCLE
//! recom --catalog catalog.json songs "Barbie Girl" "Turn Back Time"
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "recom")]
#[command(about = "Recom: context-aware distances between listening states")]
#[command(version)]
pub struct Args {
    /// Catalog fixture (JSON array of releases)
    ///
    /// Defaults to catalog.json in the Recom data directory.
    #[arg(long, global = true, env = "RECOM_CATALOG", value_hint = clap::ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    /// Gazetteer fixture (JSON object of place -> [lat, lon])
    ///
    /// Defaults to gazetteer.json in the Recom data directory.
    #[arg(long, global = true, env = "RECOM_GAZETTEER", value_hint = clap::ValueHint::FilePath)]
    pub gazetteer: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Distance in meters between two locations
    ///
    /// Locations are WGS84 "lat,lon" pairs, as found in telemetry.
    Locations {
        #[arg(allow_hyphen_values = true)]
        first: String,
        #[arg(allow_hyphen_values = true)]
        second: String,
    },

    /// Change in activity intensity from FIRST to SECOND
    ///
    /// Activities: STILL, ON_FOOT, ON_BICYCLE, IN_VEHICLE.
    /// Positive when the user speeds up.
    Activities { first: String, second: String },

    /// Look up a song and print its details
    Song {
        /// Free-text song query
        query: String,
    },

    /// Attribute distances between two songs, as JSON
    Songs { first: String, second: String },

    /// Distances between two telemetry samples, as JSON
    ///
    /// Each sample is a JSON object with the fields timestamp, imei,
    /// query, location and activity.
    Compare { first: String, second: String },

    /// Generate shell completions
    ///
    /// Usage: recom completion bash > ~/.local/share/bash-completion/completions/recom
    Completion { shell: Shell },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_negative_coordinates_are_positional() {
        let args = Args::try_parse_from(["recom", "locations", "-37.95,144.42", "-37.65,143.92"]).unwrap();
        match args.command {
            Command::Locations { first, second } => {
                assert_eq!(first, "-37.95,144.42");
                assert_eq!(second, "-37.65,143.92");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_fixture_flags() {
        let args = Args::try_parse_from(["recom", "song", "Believe", "--catalog", "c.json"]).unwrap();
        assert_eq!(args.catalog, Some(PathBuf::from("c.json")));
        assert!(matches!(args.command, Command::Song { .. }));
    }
}
