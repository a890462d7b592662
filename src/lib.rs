//! Distance primitives between listening contexts.
//!
//! A user state is one telemetry sample: a device ([`user_state::Imei`]),
//! an activity, a GPS location, a timestamp and the song being played.
//! Songs are enriched from a music catalog when they are created. Recom
//! compares two states attribute by attribute; ranking on top of these
//! distances is left to callers.
//!
//! Core modules:
//! - [`user_state`] - User states and their distances
//! - [`song`] - Songs, catalog enrichment and song distances
//! - [`taxonomy`] - Genre and style domains
//! - [`geo`] - Coordinates, Vincenty distance, geocoding seam
//! - [`catalog`] - Catalog lookup seam and in-memory catalog
//! - [`ingest`] - Telemetry rows to user states
//!
//! ### Supporting Modules
//!
//! - [`sens_me`] - 2D sensMe plane
//! - [`error`] - Domain error type
//! - [`config`] - Data directory and fixture locations
//! - [`cli`] - Command-line interface definitions
//!
//! ## Quick Start Example
//!
//! ```
//! use recom::catalog::{CatalogEntry, ReleaseDetails, StaticCatalog};
//! use recom::geo::{Coordinates, Gazetteer};
//! use recom::song::Song;
//! use recom::user_state::{parse_timestamp, Activity, Imei, UserState};
//!
//! let catalog = StaticCatalog::new(vec![CatalogEntry {
//!     id: 1042,
//!     artist: "Aqua".to_string(),
//!     title: "Barbie Girl".to_string(),
//!     details: ReleaseDetails {
//!         genres: vec!["Pop".to_string()],
//!         ..ReleaseDetails::default()
//!     },
//! }]);
//!
//! let song = Song::lookup("Barbie Girl", &catalog)?;
//! let before = UserState::new(
//!     "123456789012345".parse::<Imei>()?,
//!     Activity::Still,
//!     "41.512108,-81.607045".parse::<Coordinates>()?,
//!     parse_timestamp("2015-03-01 12:00:00")?,
//!     song.clone(),
//! );
//! let after = UserState::new(
//!     "123456789012345".parse::<Imei>()?,
//!     Activity::OnBicycle,
//!     "41.52,-81.6".parse::<Coordinates>()?,
//!     parse_timestamp("2015-03-01 12:20:00")?,
//!     song,
//! );
//!
//! let distance = before.distance(&after, &Gazetteer::new())?;
//! assert_eq!(distance.activity, 2);
//! assert_eq!(distance.time.num_minutes(), 20);
//! # Ok::<(), recom::error::RecomError>(())
//! ```
//!
//! ## Error Handling
//!
//! Domain operations return [`error::Result`]; validation failures are
//! reported immediately and never retried. Ingestion, configuration and
//! the binary use `anyhow::Result` for context-rich messages.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod geo;
pub mod ingest;
pub mod sens_me;
pub mod song;
pub mod taxonomy;
pub mod user_state;
