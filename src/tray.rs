//! Tray application using tray-icon.
//!
//! This module implements the status bar item and menu, plus the
//! scheduling around them: the hourly re-evaluation loop and
//! user-triggered cache refreshes.

use crate::cache;
use crate::config::Preferences;
use crate::electricitymap::ElectricityMapClient;
use crate::forecast::ForecastSnapshot;
use crate::icon;
use crate::schedule;
use crate::status::{self, Status};
use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tray_icon::{
    menu::{Menu, MenuEvent, MenuId, MenuItemBuilder, PredefinedMenuItem},
    TrayIcon, TrayIconBuilder,
};
use winit::{event::Event, event_loop::EventLoop};

const SOURCE_URL: &str = "https://app.electricitymaps.com";
const ABOUT_URL: &str = "https://www.electricitymaps.com/";

/// Commands from the menu event handler
#[derive(Debug, Clone)]
pub enum TrayCommand {
    OpenSource,
    RefreshCache,
    OpenAbout,
    Quit,
}

/// Updates delivered to the event loop from background tasks
enum TrayUpdate {
    /// A wall-clock hour boundary passed (or the app just started):
    /// re-evaluate the cached forecast.
    HourTick,
    /// A refresh finished, successfully or not; the cache file has
    /// already been overwritten with this snapshot.
    SnapshotFetched(ForecastSnapshot),
}

/// Shared state for the tray application
pub struct TrayState {
    pub snapshot: ForecastSnapshot,
    pub threshold: i64,
}

pub fn run_event_loop(prefs: Preferences) -> Result<()> {
    // Create event loop with user event support
    let event_loop = EventLoop::<TrayCommand>::with_user_event().build()?;

    // Use std::sync::mpsc for menu event handlers (they run outside the
    // tokio runtime)
    let (event_tx, event_rx) = std::sync::mpsc::channel::<TrayCommand>();

    // Use tokio::sync::mpsc for async task communication
    let (update_tx, mut update_rx) = mpsc::channel::<TrayUpdate>(32);

    let cache_path = cache::path()?;
    let snapshot = cache::load(&cache_path);
    let stale = snapshot.is_stale(Utc::now());

    let state = Arc::new(Mutex::new(TrayState {
        snapshot,
        threshold: prefs.threshold,
    }));
    let client = Arc::new(ElectricityMapClient::new(prefs.api_token));
    let zone = Arc::new(prefs.zone);

    // Set up menu event handler - uses std::sync::mpsc
    let event_tx_clone = event_tx.clone();
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        if let Some(cmd) = parse_menu_event(&event.id.0) {
            let _ = event_tx_clone.send(cmd);
        }
    }));

    // Create initial tray icon and menu
    let tray_icon = create_tray_icon(false)?;
    let initial_menu = {
        let s = state.lock().unwrap();
        build_menu(&s.snapshot.updated_at)
    };
    let tray = TrayIconBuilder::new()
        .with_title("Loading")
        .with_tooltip("Loading")
        .with_icon(tray_icon)
        .with_menu(Box::new(initial_menu))
        .build()?;

    // Spawn the timer task: refresh once at startup if the cache has
    // expired (checked only here), then tick on every hour boundary.
    // The first tick fires immediately so the startup state is shown
    // without waiting for the next :00:00.
    let client_clone = client.clone();
    let zone_clone = zone.clone();
    let cache_path_clone = cache_path.clone();
    let update_tx_clone = update_tx.clone();
    tokio::spawn(async move {
        if stale {
            tracing::info!("Cache is older than a day, refreshing");
            refresh_and_send(&client_clone, &zone_clone, &cache_path_clone, &update_tx_clone)
                .await;
        }

        loop {
            if update_tx_clone.send(TrayUpdate::HourTick).await.is_err() {
                return;
            }
            let wait = schedule::until_next_hour(Utc::now());
            tracing::info!("Waiting {:?} until the next hour boundary", wait);
            tokio::time::sleep(wait).await;
        }
    });

    // Run the event loop
    event_loop.run(move |event, elwt| {
        match event {
            Event::UserEvent(cmd) => {
                handle_command(cmd, &client, &zone, &cache_path, &update_tx);
            }
            Event::AboutToWait => {
                // Process menu events from std::sync::mpsc (non-blocking)
                while let Ok(cmd) = event_rx.try_recv() {
                    handle_command(cmd, &client, &zone, &cache_path, &update_tx);
                }

                // Process updates from async tasks
                while let Ok(update) = update_rx.try_recv() {
                    match update {
                        TrayUpdate::HourTick => {
                            let needs_refresh = {
                                let s = state.lock().unwrap();
                                let current =
                                    status::evaluate(&s.snapshot, s.threshold, Utc::now());
                                update_tray(&tray, &current, &s.snapshot.updated_at);
                                current.is_unknown()
                            };

                            // No entry for this hour means the cache is
                            // stale or has a gap; fetch a fresh forecast.
                            if needs_refresh {
                                handle_command(
                                    TrayCommand::RefreshCache,
                                    &client,
                                    &zone,
                                    &cache_path,
                                    &update_tx,
                                );
                            }
                        }
                        TrayUpdate::SnapshotFetched(snapshot) => {
                            let mut s = state.lock().unwrap();
                            s.snapshot = snapshot;
                            let current =
                                status::evaluate(&s.snapshot, s.threshold, Utc::now());
                            update_tray(&tray, &current, &s.snapshot.updated_at);
                        }
                    }
                }
            }
            Event::LoopExiting => {
                elwt.exit();
            }
            _ => {}
        }
    })?;

    Ok(())
}

fn handle_command(
    cmd: TrayCommand,
    client: &Arc<ElectricityMapClient>,
    zone: &Arc<String>,
    cache_path: &Path,
    update_tx: &mpsc::Sender<TrayUpdate>,
) {
    match cmd {
        TrayCommand::OpenSource => {
            let _ = open::that(SOURCE_URL);
        }
        TrayCommand::OpenAbout => {
            let _ = open::that(ABOUT_URL);
        }
        TrayCommand::RefreshCache => {
            let client = client.clone();
            let zone = zone.clone();
            let cache_path = cache_path.to_path_buf();
            let tx = update_tx.clone();
            tokio::spawn(async move {
                refresh_and_send(&client, &zone, &cache_path, &tx).await;
            });
        }
        TrayCommand::Quit => {
            std::process::exit(0);
        }
    }
}

/// Fetch a fresh forecast, overwrite the cache file, and hand the
/// result to the event loop. The cache is written even when the fetch
/// came back empty; a failed refresh still ends the refresh.
async fn refresh_and_send(
    client: &ElectricityMapClient,
    zone: &str,
    cache_path: &Path,
    tx: &mpsc::Sender<TrayUpdate>,
) {
    let snapshot = client.fetch_forecast(zone).await;
    cache::save(cache_path, &snapshot);
    let _ = tx.send(TrayUpdate::SnapshotFetched(snapshot)).await;
}

fn parse_menu_event(id: &str) -> Option<TrayCommand> {
    match id {
        "source" => Some(TrayCommand::OpenSource),
        "cache" => Some(TrayCommand::RefreshCache),
        "about" => Some(TrayCommand::OpenAbout),
        "quit" => Some(TrayCommand::Quit),
        _ => None,
    }
}

fn update_tray(tray: &TrayIcon, current: &Status, updated_at: &str) {
    let title = current.title();
    let _ = tray.set_title(Some(&title));
    let _ = tray.set_tooltip(Some(&title));

    if let Ok(tray_icon) = create_tray_icon(current.is_below_threshold()) {
        let _ = tray.set_icon(Some(tray_icon));
    }

    // Rebuild the menu so the cache timestamp entry stays current
    let menu = build_menu(updated_at);
    let _ = tray.set_menu(Some(Box::new(menu)));
}

fn build_menu(updated_at: &str) -> Menu {
    let menu = Menu::new();

    let source_item = MenuItemBuilder::new()
        .text("Source of data")
        .enabled(true)
        .id(MenuId::new("source"))
        .build();
    let _ = menu.append(&source_item);

    // Clicking the timestamp forces a refresh
    let cache_item = MenuItemBuilder::new()
        .text(format!("Cache updated: {}", updated_at))
        .enabled(true)
        .id(MenuId::new("cache"))
        .build();
    let _ = menu.append(&cache_item);

    let _ = menu.append(&PredefinedMenuItem::separator());

    let about_item = MenuItemBuilder::new()
        .text("About")
        .enabled(true)
        .id(MenuId::new("about"))
        .build();
    let _ = menu.append(&about_item);

    let quit_item = MenuItemBuilder::new()
        .text("Quit")
        .enabled(true)
        .id(MenuId::new("quit"))
        .build();
    let _ = menu.append(&quit_item);

    menu
}

fn create_tray_icon(below_threshold: bool) -> Result<tray_icon::Icon> {
    let rgba = icon::generate_tray_icon(below_threshold);
    tray_icon::Icon::from_rgba(rgba, icon::ICON_SIZE, icon::ICON_SIZE)
        .map_err(|e| anyhow::anyhow!("Failed to create icon: {}", e))
}
