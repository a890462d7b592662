//! # Telemetry Ingestion
//!
//! Turns already-split telemetry records into [`UserState`]s and hands
//! them to a [`StateSink`].
//!
//! ## Failure Policy
//!
//! - A catalog failure (no match, provider error) skips the row with a
//!   warning; unmatched songs are common in real telemetry.
//! - Any validation failure (bad IMEI, activity, location or timestamp)
//!   aborts the run. Genre and style labels are not validated here.
//! - Sink failures abort the run.

use crate::catalog::CatalogLookup;
use crate::error::RecomError;
use crate::geo::Coordinates;
use crate::song::Song;
use crate::user_state::{parse_timestamp, Activity, Imei, UserState};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Column positions of a raw telemetry record:
/// `index, timestamp, imei, _, query, _, _, "lat,lon", activity`.
const COL_TIMESTAMP: usize = 1;
const COL_IMEI: usize = 2;
const COL_QUERY: usize = 4;
const COL_LOCATION: usize = 7;
const COL_ACTIVITY: usize = 8;

/// The fields of one telemetry record, still as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRow {
    pub timestamp: String,
    pub imei: String,
    pub query: String,
    /// `"lat,lon"`
    pub location: String,
    pub activity: String,
}

impl TelemetryRow {
    /// Picks the relevant columns out of a raw record.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        let column = |index: usize| -> Result<String> {
            fields
                .get(index)
                .map(|field| field.as_ref().to_string())
                .with_context(|| format!("Telemetry record has {} columns, missing column {index}", fields.len()))
        };
        Ok(Self {
            timestamp: column(COL_TIMESTAMP)?,
            imei: column(COL_IMEI)?,
            query: column(COL_QUERY)?,
            location: column(COL_LOCATION)?,
            activity: column(COL_ACTIVITY)?,
        })
    }

    /// Validates every field and looks the song up in `catalog`.
    ///
    /// Fields are checked in this order: timestamp, song, IMEI, activity,
    /// location. A row whose song the catalog cannot resolve therefore
    /// fails with [`RecomError::Catalog`] even if a later field is also
    /// malformed, and [`ingest_rows`] skips it.
    ///
    /// # Errors
    ///
    /// The first [`RecomError`] encountered.
    pub fn to_user_state(&self, catalog: &dyn CatalogLookup) -> Result<UserState, RecomError> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        let song = Song::lookup(&self.query, catalog)?;
        let imei: Imei = self.imei.parse()?;
        let activity: Activity = self.activity.parse()?;
        let location: Coordinates = self.location.parse()?;
        debug!("Creating user state for {imei} at {timestamp}");
        Ok(UserState::new(imei, activity, location, timestamp, song))
    }
}

/// Destination for ingested user states.
pub trait StateSink {
    fn write(&mut self, state: UserState) -> Result<()>;
}

/// Keeps every state in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub states: Vec<UserState>,
}

impl StateSink for MemorySink {
    fn write(&mut self, state: UserState) -> Result<()> {
        self.states.push(state);
        Ok(())
    }
}

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub rows: usize,
    pub written: usize,
    /// Rows dropped because the catalog lookup failed
    pub skipped: usize,
}

/// Builds a user state for every row and writes it to `sink`.
pub fn ingest_rows<I>(rows: I, catalog: &dyn CatalogLookup, sink: &mut dyn StateSink) -> Result<IngestReport>
where
    I: IntoIterator<Item = TelemetryRow>,
{
    let mut report = IngestReport::default();

    for (index, row) in rows.into_iter().enumerate() {
        report.rows += 1;
        match row.to_user_state(catalog) {
            Ok(state) => {
                sink.write(state)
                    .with_context(|| format!("Failed to write user state for row {index}"))?;
                report.written += 1;
            }
            Err(RecomError::Catalog(err)) => {
                warn!("Skipping row {index} (`{}`): {err}", row.query);
                report.skipped += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Invalid telemetry row {index}"));
            }
        }
    }

    info!(
        "Ingested {} rows: {} written, {} skipped",
        report.rows, report.written, report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, ReleaseDetails, StaticCatalog};

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![CatalogEntry {
            id: 9,
            artist: "Aqua".to_string(),
            title: "Barbie Girl".to_string(),
            details: ReleaseDetails::default(),
        }])
    }

    fn row(query: &str, activity: &str) -> TelemetryRow {
        TelemetryRow {
            timestamp: "2015-03-01 12:00:00".to_string(),
            imei: "123456789012345".to_string(),
            query: query.to_string(),
            location: "41.512108,-81.607045".to_string(),
            activity: activity.to_string(),
        }
    }

    #[test]
    fn test_from_fields_maps_columns() {
        let fields = [
            "0",
            "2015-03-01 12:00:00",
            "123456789012345",
            "x",
            "Barbie Girl",
            "y",
            "z",
            "41.5,-81.6",
            "STILL",
        ];
        let row = TelemetryRow::from_fields(&fields[..]).unwrap();
        assert_eq!(row.timestamp, "2015-03-01 12:00:00");
        assert_eq!(row.imei, "123456789012345");
        assert_eq!(row.query, "Barbie Girl");
        assert_eq!(row.location, "41.5,-81.6");
        assert_eq!(row.activity, "STILL");

        assert!(TelemetryRow::from_fields(&fields[..8]).is_err());
    }

    #[test]
    fn test_catalog_misses_are_skipped() {
        let mut sink = MemorySink::default();
        let rows = vec![row("Barbie Girl", "STILL"), row("Unknown Song", "ON_FOOT"), row("aqua", "IN_VEHICLE")];

        let report = ingest_rows(rows, &catalog(), &mut sink).unwrap();
        assert_eq!(report, IngestReport { rows: 3, written: 2, skipped: 1 });
        assert_eq!(sink.states.len(), 2);
        assert_eq!(sink.states[1].song().release_id(), 9);
    }

    #[test]
    fn test_validation_errors_abort() {
        let mut sink = MemorySink::default();
        let rows = vec![row("Barbie Girl", "STILL"), row("Barbie Girl", "STANDING")];

        let err = ingest_rows(rows, &catalog(), &mut sink).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecomError>(),
            Some(RecomError::UnknownActivity(_))
        ));
        assert_eq!(sink.states.len(), 1);
    }

    #[test]
    fn test_unmatched_song_is_reported_before_other_fields() {
        let mut bad = row("Unknown Song", "STANDING");
        bad.imei = "42".to_string();
        assert!(matches!(bad.to_user_state(&catalog()), Err(RecomError::Catalog(_))));

        let mut sink = MemorySink::default();
        let report = ingest_rows(vec![bad, row("Barbie Girl", "STILL")], &catalog(), &mut sink).unwrap();
        assert_eq!(report, IngestReport { rows: 2, written: 1, skipped: 1 });

        let mut bad_time = row("Unknown Song", "STILL");
        bad_time.timestamp = "yesterday".to_string();
        assert!(matches!(
            bad_time.to_user_state(&catalog()),
            Err(RecomError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_release_with_unlisted_style_is_ingested() {
        let catalog = StaticCatalog::new(vec![
            CatalogEntry {
                id: 9,
                artist: "Aqua".to_string(),
                title: "Barbie Girl".to_string(),
                details: ReleaseDetails::default(),
            },
            CatalogEntry {
                id: 12,
                artist: "Kavinsky".to_string(),
                title: "Nightcall".to_string(),
                details: ReleaseDetails {
                    genres: vec!["Electronic".to_string()],
                    styles: vec!["Synthwave".to_string()],
                    ..ReleaseDetails::default()
                },
            },
        ]);
        let rows = vec![row("Barbie Girl", "STILL"), row("Nightcall", "ON_FOOT"), row("aqua", "IN_VEHICLE")];

        let mut sink = MemorySink::default();
        let report = ingest_rows(rows, &catalog, &mut sink).unwrap();
        assert_eq!(report, IngestReport { rows: 3, written: 3, skipped: 0 });
        assert_eq!(sink.states[1].song().style(), Some("Synthwave"));
    }
}
