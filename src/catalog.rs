//! # Music Catalog Lookup
//!
//! Songs are enriched from an external music catalog in two steps: a
//! free-text search that yields the best-matching release id, then a
//! details request for that release. [`CatalogLookup`] is the seam for
//! any provider; [`StaticCatalog`] is an in-memory provider backed by a
//! JSON fixture.
//!
//! Catalog ids identify releases, not individual tracks, so two songs of
//! the same album share one id.

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failures reported by a catalog provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("no release matches `{0}`")]
    NoMatch(String),

    #[error("release {0} not found")]
    ReleaseNotFound(u64),

    /// Transport or provider-side failure
    #[error("provider error: {0}")]
    Provider(String),
}

/// Metadata of one release. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseDetails {
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    pub tempo: Option<u32>,
    pub year: Option<i32>,
    pub country: Option<String>,
}

impl ReleaseDetails {
    /// The first listed genre, which is the one used for distances.
    #[must_use]
    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }

    #[must_use]
    pub fn primary_style(&self) -> Option<&str> {
        self.styles.first().map(String::as_str)
    }
}

/// A catalog that can resolve free-text song queries.
pub trait CatalogLookup: Send + Sync {
    /// Id of the best-matching release for `query`.
    fn search_release(&self, query: &str) -> Result<u64, CatalogError>;

    /// Details of the release with the given id.
    fn release_details(&self, release_id: u64) -> Result<ReleaseDetails, CatalogError>;
}

/// One release of a [`StaticCatalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub artist: String,
    pub title: String,
    #[serde(flatten)]
    pub details: ReleaseDetails,
}

/// In-memory catalog.
///
/// A query matches an entry when every whitespace-separated word of the
/// query occurs (case-insensitively) in the entry's artist or title.
/// Entries are searched in insertion order and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Loads a JSON array of [`CatalogEntry`] objects.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog at {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("Invalid catalog file {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(raw).context("Catalog must be an array of releases")?;
        Ok(Self::new(entries))
    }

    fn matches(entry: &CatalogEntry, words: &[String]) -> bool {
        let haystack = format!("{} {}", entry.artist, entry.title).to_lowercase();
        words.iter().all(|word| haystack.contains(word.as_str()))
    }
}

impl CatalogLookup for StaticCatalog {
    fn search_release(&self, query: &str) -> Result<u64, CatalogError> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Err(CatalogError::NoMatch(query.to_string()));
        }

        let hit = self
            .entries
            .iter()
            .find(|entry| Self::matches(entry, &words))
            .ok_or_else(|| CatalogError::NoMatch(query.to_string()))?;
        debug!("Query `{query}` matched release {} ({} - {})", hit.id, hit.artist, hit.title);
        Ok(hit.id)
    }

    fn release_details(&self, release_id: u64) -> Result<ReleaseDetails, CatalogError> {
        self.entries
            .iter()
            .find(|entry| entry.id == release_id)
            .map(|entry| entry.details.clone())
            .ok_or(CatalogError::ReleaseNotFound(release_id))
    }
}
