//! Forecast cache persistence.
//!
//! The cache is a flat JSON file holding the last fetched
//! [`ForecastSnapshot`]. Derived timestamp fields are not persisted;
//! they are recomputed from the raw strings on every load.

use crate::forecast::ForecastSnapshot;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Load the cached snapshot from `path`. A missing or invalid file
/// yields an empty snapshot rather than an error.
pub fn load(path: &Path) -> ForecastSnapshot {
    match try_load(path) {
        Ok(snapshot) => snapshot.parse_timestamps(),
        Err(e) => {
            tracing::warn!("Failed to load cache from {:?}: {}", path, e);
            ForecastSnapshot::default()
        }
    }
}

fn try_load(path: &Path) -> Result<ForecastSnapshot> {
    let content = fs::read_to_string(path).context("Failed to read cache file")?;
    serde_json::from_str(&content).context("Failed to parse cache file")
}

/// Overwrite the cache file at `path` with `snapshot`, best effort.
/// Failures are logged and swallowed.
pub fn save(path: &Path, snapshot: &ForecastSnapshot) {
    if let Err(e) = try_save(path, snapshot) {
        tracing::warn!("Failed to save cache to {:?}: {}", path, e);
    }
}

fn try_save(path: &Path, snapshot: &ForecastSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create cache directory")?;
    }
    let content = serde_json::to_string(snapshot).context("Failed to serialize cache")?;
    fs::write(path, content).context("Failed to write cache file")
}

/// Get the path to the cache file
pub fn path() -> Result<PathBuf> {
    Ok(crate::config::config_dir()?.join("cache.json"))
}
