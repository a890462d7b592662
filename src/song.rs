//! # Songs
//!
//! A [`Song`] is identified by the free-text query found in telemetry
//! and enriched once, at construction, with the metadata of the
//! best-matching catalog release. Songs are immutable afterwards.
//!
//! Song-to-song comparison is a set of per-attribute distances gathered
//! in [`SongDistance`]; see [`distance_songs`].
//!
//! Genre and style are kept as the catalog reported them. They are only
//! checked against the [`taxonomy`](crate::taxonomy) when two songs are
//! compared, so a release with an exotic style still yields a usable song.

use crate::catalog::{CatalogLookup, ReleaseDetails};
use crate::error::{RecomError, Result};
use crate::geo::{vincenty_distance, Geocoder};
use crate::sens_me::{distance_sens_me, SensMe};
use crate::taxonomy::{distance_genres, distance_styles, is_unknown_label, UNKNOWN_DISTANCE, UNKNOWN_LABEL};
use log::{debug, trace};
use serde::Serialize;
use std::fmt;

/// How a song, and its release metadata, is represented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    query_string: String,
    /// Catalog release id. Shared by every track of a release.
    release_id: u64,
    /// First genre of the release, as labelled by the catalog
    genre: Option<String>,
    style: Option<String>,
    /// Beats per minute, `0` when unknown (seldom available).
    tempo: u32,
    year: Option<i32>,
    /// Country of first release
    country: Option<String>,
    sens_me: SensMe,
}

impl Song {
    /// Looks `query` up in `catalog` and builds the song from the
    /// best-matching release.
    ///
    /// # Errors
    ///
    /// - [`RecomError::EmptyQuery`] for an empty query
    /// - [`RecomError::Catalog`] if the search or the details request fails
    pub fn lookup(query: &str, catalog: &dyn CatalogLookup) -> Result<Self> {
        if query.trim().is_empty() {
            return Err(RecomError::EmptyQuery);
        }
        debug!("Creating song for query `{query}`");
        let release_id = catalog.search_release(query)?;
        let details = catalog.release_details(release_id)?;
        Self::from_release(query, release_id, &details)
    }

    /// Builds a song from already fetched release metadata.
    ///
    /// Only the first genre and the first style of the release are kept.
    /// Missing values and the unknown sentinels (`None`, `unknown`, empty)
    /// become `None`; a missing tempo becomes `0`.
    ///
    /// Labels are stored verbatim. Whether they belong to the taxonomy is
    /// decided by [`distance_songs`], not here.
    ///
    /// # Errors
    ///
    /// [`RecomError::EmptyQuery`] if `query` is blank. Nothing else about
    /// the release can make construction fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use recom::catalog::ReleaseDetails;
    /// use recom::song::Song;
    ///
    /// let details = ReleaseDetails {
    ///     genres: vec!["Electronic".to_string(), "Pop".to_string()],
    ///     styles: vec!["Synthwave".to_string()],
    ///     country: Some("None".to_string()),
    ///     ..ReleaseDetails::default()
    /// };
    /// let song = Song::from_release("Nightcall", 7, &details)?;
    /// assert_eq!(song.genre(), Some("Electronic"));
    /// assert_eq!(song.style(), Some("Synthwave"));
    /// assert_eq!(song.country(), None);
    /// assert_eq!(song.tempo(), 0);
    /// # Ok::<(), recom::error::RecomError>(())
    /// ```
    pub fn from_release(query: &str, release_id: u64, details: &ReleaseDetails) -> Result<Self> {
        if query.trim().is_empty() {
            return Err(RecomError::EmptyQuery);
        }

        let known = |label: Option<&str>| label.filter(|l| !is_unknown_label(l)).map(str::to_string);
        let genre = known(details.primary_genre());
        let style = known(details.primary_style());
        let country = known(details.country.as_deref());

        Ok(Self {
            query_string: query.to_string(),
            release_id,
            genre,
            style,
            tempo: details.tempo.unwrap_or(0),
            year: details.year,
            country,
            sens_me: SensMe::PLACEHOLDER,
        })
    }

    #[must_use]
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    #[must_use]
    pub fn release_id(&self) -> u64 {
        self.release_id
    }

    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    #[must_use]
    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    #[must_use]
    pub fn sens_me(&self) -> SensMe {
        self.sens_me
    }

    /// Shorthand for [`distance_songs`].
    pub fn distance(&self, other: &Song, geocoder: &dyn Geocoder) -> Result<SongDistance> {
        distance_songs(self, other, geocoder)
    }
}

fn or_unknown<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNKNOWN_LABEL.to_string(), |v| v.to_string())
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query String {}", self.query_string)?;
        writeln!(f, "Genre {}", or_unknown(self.genre()))?;
        writeln!(f, "Style {}", or_unknown(self.style()))?;
        writeln!(f, "Release id {}", self.release_id)?;
        writeln!(f, "Tempo {}", self.tempo)?;
        writeln!(f, "Year {}", or_unknown(self.year))?;
        writeln!(f, "Country {}", or_unknown(self.country.as_deref()))?;
        write!(f, "SensMe {}", self.sens_me)
    }
}

/// Per-attribute distances between two songs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongDistance {
    pub distance_genre: f64,
    pub distance_style: f64,
    /// Meters between the release countries
    pub distance_country: f64,
    /// `None` when either year is unknown
    pub distance_year: Option<i64>,
    pub distance_tempo: i64,
    pub distance_sens_me: f64,
}

/// Distance in meters between two countries, after geocoding their
/// names. [`UNKNOWN_DISTANCE`] if either name is an unknown sentinel.
///
/// # Errors
///
/// [`RecomError::Geocode`] if `geocoder` cannot place a country.
pub fn distance_countries(first: &str, second: &str, geocoder: &dyn Geocoder) -> Result<f64> {
    if is_unknown_label(first) || is_unknown_label(second) {
        return Ok(UNKNOWN_DISTANCE);
    }
    let from = geocoder
        .geocode(first)
        .ok_or_else(|| RecomError::Geocode(first.to_string()))?;
    let to = geocoder
        .geocode(second)
        .ok_or_else(|| RecomError::Geocode(second.to_string()))?;
    vincenty_distance(from, to)
}

/// Years between two releases, negative if `first` is earlier.
#[must_use]
pub fn distance_years(first: i32, second: i32) -> i64 {
    i64::from(first) - i64::from(second)
}

/// Tempo difference, negative if `first` is slower.
#[must_use]
pub fn distance_tempos(first: u32, second: u32) -> i64 {
    i64::from(first) - i64::from(second)
}

/// All attribute distances between two songs.
///
/// # Errors
///
/// - [`RecomError::UnrecognizedGenre`] / [`RecomError::UnrecognizedStyle`]
///   if either song carries a label outside the taxonomy
/// - [`RecomError::Geocode`] / [`RecomError::NoConvergence`] if the release
///   countries cannot be placed or are nearly antipodal
pub fn distance_songs(first: &Song, second: &Song, geocoder: &dyn Geocoder) -> Result<SongDistance> {
    let distance = SongDistance {
        distance_genre: distance_genres(
            first.genre().unwrap_or(UNKNOWN_LABEL),
            second.genre().unwrap_or(UNKNOWN_LABEL),
        )?,
        distance_style: distance_styles(
            first.style().unwrap_or(UNKNOWN_LABEL),
            second.style().unwrap_or(UNKNOWN_LABEL),
        )?,
        distance_country: distance_countries(
            first.country().unwrap_or(UNKNOWN_LABEL),
            second.country().unwrap_or(UNKNOWN_LABEL),
            geocoder,
        )?,
        distance_year: first.year.zip(second.year).map(|(a, b)| distance_years(a, b)),
        distance_tempo: distance_tempos(first.tempo, second.tempo),
        distance_sens_me: distance_sens_me(first.sens_me, second.sens_me),
    };
    trace!(
        "Song distance `{}` -> `{}`: {distance:?}",
        first.query_string,
        second.query_string
    );
    Ok(distance)
}
