//! co2-tray
//!
//! This library provides the core functionality for co2-tray, a menu
//! bar indicator for forecasted grid carbon intensity: the Electricity
//! Map client, the forecast cache, and the hourly status evaluation
//! driving the tray item.

pub mod cache;
pub mod config;
pub mod electricitymap;
pub mod forecast;
pub mod icon;
pub mod schedule;
pub mod status;
pub mod tray;

pub use config::Preferences;
pub use electricitymap::ElectricityMapClient;
pub use forecast::{ForecastEntry, ForecastSnapshot};
pub use status::Status;
