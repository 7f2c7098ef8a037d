//! co2-tray - a menu bar indicator for forecasted grid carbon intensity
//!
//! Features:
//! - Shows the current hour's forecasted carbon intensity in the menu bar
//! - Green icon when the forecast drops below your configured threshold
//! - Hourly re-evaluation against a locally cached forecast
//! - Click the cache timestamp to force a refresh

use anyhow::Result;
use co2_tray::config::Preferences;
use co2_tray::tray;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize simple logging
    tracing_subscriber::fmt::init();

    tracing::info!("Starting co2-tray...");

    let prefs = Preferences::load(&Preferences::path()?);

    if prefs.api_token.is_empty() {
        tracing::warn!("No API token configured; refreshes will come back empty");
    }

    // Run the tray application
    tray::run_event_loop(prefs)?;

    Ok(())
}
