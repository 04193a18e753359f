//! GPSManager Settings Crate
//!
//! Application configuration, its file formats, and where it is stored.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{
    Config, DrawingSettings, FeedSettings, FeedSource, MapSettings, Rgb, SimulatedFeedSettings,
    StatusSettings, StorageBackend, StorageSettings, DEFAULT_FEED_HOST, DEFAULT_FEED_PORT,
    DEFAULT_SIMULATED_FIX,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use manager::SettingsManager;
