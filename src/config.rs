//! User preferences persistence.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration, stored as a flat JSON file. Loaded once at
/// startup and immutable for the rest of the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "ApiToken", default)]
    pub api_token: String,

    #[serde(rename = "Zone", default)]
    pub zone: String,

    #[serde(rename = "Threshold", default)]
    pub threshold: i64,
}

impl Preferences {
    /// Load preferences from `path`. A missing or unreadable file yields
    /// empty preferences; the tray then shows the unknown status until a
    /// valid file is in place.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!("Failed to load preferences from {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read preferences file")?;
        serde_json::from_str(&content).context("Failed to parse preferences file")
    }

    /// Write preferences to `path`, best effort. Failures are logged
    /// and swallowed.
    pub fn save(&self, path: &Path) {
        if let Err(e) = self.try_save(path) {
            tracing::warn!("Failed to save preferences to {:?}: {}", path, e);
        }
    }

    fn try_save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
        fs::write(path, content).context("Failed to write preferences file")
    }

    /// Get the path to the preferences file
    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join("preferences.json"))
    }
}

/// Get the directory holding the preferences and cache files
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not find config directory")?;
    Ok(config_dir.join("co2-tray"))
}
