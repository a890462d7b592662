//! # Configuration Module
//!
//! Runtime configuration and data directory setup for Recom. The lookup
//! fixtures (catalog and gazetteer) live in the platform data directory
//! unless paths are given explicitly:
//!
//! - Linux: `~/.local/share/recom/`
//! - macOS: `~/Library/Application Support/recom/`
//! - Windows: `%APPDATA%\recom\`

use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::StaticCatalog;
use crate::geo::Gazetteer;

const CATALOG_FILE: &str = "catalog.json";
const GAZETTEER_FILE: &str = "gazetteer.json";

/// Returns the platform-appropriate data directory for Recom, creating it
/// if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The recom subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let recom_dir = data_dir.join("recom");
    fs::create_dir_all(&recom_dir).with_context(|| {
        format!(
            "Failed to create Recom data directory at {}. Please check file permissions.",
            recom_dir.display()
        )
    })?;

    Ok(recom_dir)
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Directory holding the default fixtures
    pub data_dir: PathBuf,
    /// JSON catalog consulted for song metadata
    pub catalog_path: PathBuf,
    /// JSON gazetteer used to geocode release countries
    pub gazetteer_path: PathBuf,
}

impl RuntimeConfig {
    /// Configuration rooted in the platform data directory.
    pub fn new() -> Result<Self> {
        Ok(Self::with_data_dir(get_data_dir()?))
    }

    /// Configuration with both fixtures inside `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            catalog_path: data_dir.join(CATALOG_FILE),
            gazetteer_path: data_dir.join(GAZETTEER_FILE),
            data_dir,
        }
    }

    /// Applies explicit fixture paths (command-line flags or environment
    /// variables). Relative paths are resolved against the working
    /// directory.
    pub fn with_overrides(mut self, catalog: Option<&Path>, gazetteer: Option<&Path>) -> Result<Self> {
        if let Some(path) = catalog {
            self.catalog_path = absolute(path)?;
        }
        if let Some(path) = gazetteer {
            self.gazetteer_path = absolute(path)?;
        }
        Ok(self)
    }

    pub fn load_catalog(&self) -> Result<StaticCatalog> {
        let catalog = StaticCatalog::from_json_file(&self.catalog_path)?;
        log::debug!(
            "Loaded {} releases from {}",
            catalog.entries().len(),
            self.catalog_path.display()
        );
        Ok(catalog)
    }

    /// Loads the gazetteer, or an empty one if the file does not exist.
    /// Songs without a release country never need it.
    pub fn load_gazetteer(&self) -> Result<Gazetteer> {
        if !self.gazetteer_path.exists() {
            log::warn!(
                "No gazetteer at {}, country distances will fail",
                self.gazetteer_path.display()
            );
            return Ok(Gazetteer::new());
        }
        Gazetteer::from_json_file(&self.gazetteer_path)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path
        .absolutize()
        .with_context(|| format!("Cannot resolve path {}", path.display()))?
        .into_owned())
}
