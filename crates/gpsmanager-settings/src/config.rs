//! Configuration for GPSManager
//!
//! Configuration is organized into sections:
//! - Feed settings (which position source, network endpoint, simulation script)
//! - Status indicator appearance
//! - Polygon storage backend
//! - Map and drawing behavior
//!
//! Files are JSON or TOML, chosen by extension. Every field has a default so
//! partial files are accepted.

use gpsmanager_core::GeoPoint;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Default live feed host.
pub const DEFAULT_FEED_HOST: &str = "192.168.55.250";

/// Default live feed TCP port.
pub const DEFAULT_FEED_PORT: u16 = 5555;

/// Position reported by the simulated feed when no track is configured.
pub const DEFAULT_SIMULATED_FIX: GeoPoint = GeoPoint::new(55.046307, 82.963026);

/// Position source selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Scripted feed for demos and offline use
    #[default]
    Simulated,
    /// NMEA over TCP
    Tcp,
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::Tcp => write!(f, "tcp"),
        }
    }
}

/// Scripted behavior of the simulated feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedFeedSettings {
    /// Delay before the feed reports a connection
    pub connect_delay_ms: u64,
    /// Time connected before the feed drops the connection; 0 stays connected
    pub disconnect_after_ms: u64,
    /// Interval between consecutive track points
    pub fix_interval_ms: u64,
    /// Positions reported in order while connected
    pub track: Vec<GeoPoint>,
}

impl Default for SimulatedFeedSettings {
    fn default() -> Self {
        Self {
            connect_delay_ms: 2000,
            disconnect_after_ms: 4000,
            fix_interval_ms: 1000,
            track: vec![DEFAULT_SIMULATED_FIX],
        }
    }
}

/// Position feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub source: FeedSource,
    /// Hostname or IP of the NMEA server
    pub host: String,
    /// TCP port of the NMEA server
    pub port: u16,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Reconnect after the connection drops
    pub reconnect: bool,
    /// Upper bound for the reconnect backoff
    pub max_backoff_ms: u64,
    pub simulated: SimulatedFeedSettings,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            source: FeedSource::Simulated,
            host: DEFAULT_FEED_HOST.to_string(),
            port: DEFAULT_FEED_PORT,
            connect_timeout_ms: 5000,
            reconnect: true,
            max_backoff_ms: 60_000,
            simulated: SimulatedFeedSettings::default(),
        }
    }
}

impl FeedSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// `host:port` string for dialing.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// Connection status indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSettings {
    pub connected_color: Rgb,
    pub disconnected_color: Rgb,
    pub connected_text: String,
    pub disconnected_text: String,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            connected_color: Rgb([21, 228, 30]),
            disconnected_color: Rgb([228, 21, 21]),
            connected_text: "Connected".to_string(),
            disconnected_text: "No connection".to_string(),
        }
    }
}

/// Polygon storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Volatile, lost on exit
    Memory,
    /// JSON document on disk
    #[default]
    File,
}

/// Polygon storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Document path for the file backend; unset means the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageSettings {
    /// Configured path, or `polygons.json` in the platform data directory.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("gpsmanager").join("polygons.json")))
    }
}

/// Map behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Half-size in meters of the area shown around the first fix
    pub first_fix_extent_m: f64,
    /// Radius in degrees for grabbing a vertex while editing
    pub vertex_pick_tolerance_deg: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            first_fix_extent_m: 1000.0,
            vertex_pick_tolerance_deg: 0.0005,
        }
    }
}

/// Drawing behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DrawingSettings {
    /// Commit the pending polygon when drawing is cancelled with Escape
    pub persist_on_cancel: bool,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub feed: FeedSettings,
    pub status: StatusSettings,
    pub storage: StorageSettings,
    pub map: MapSettings,
    pub drawing: DrawingSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.feed.host.trim().is_empty() {
            return Err(ConfigError::MissingValue("feed.host".to_string()));
        }
        if self.feed.port == 0 {
            return Err(ConfigError::out_of_range("feed.port", self.feed.port));
        }
        if self.feed.connect_timeout_ms == 0 {
            return Err(ConfigError::out_of_range(
                "feed.connect_timeout_ms",
                self.feed.connect_timeout_ms,
            ));
        }
        if self.feed.max_backoff_ms == 0 {
            return Err(ConfigError::out_of_range(
                "feed.max_backoff_ms",
                self.feed.max_backoff_ms,
            ));
        }

        let simulated = &self.feed.simulated;
        if simulated.track.is_empty() {
            return Err(ConfigError::MissingValue("feed.simulated.track".to_string()));
        }
        if let Some(bad) = simulated.track.iter().find(|p| !p.is_valid()) {
            return Err(ConfigError::out_of_range("feed.simulated.track", bad));
        }
        if simulated.fix_interval_ms == 0 {
            return Err(ConfigError::out_of_range(
                "feed.simulated.fix_interval_ms",
                simulated.fix_interval_ms,
            ));
        }

        if self.storage.backend == StorageBackend::File
            && self
                .storage
                .path
                .as_ref()
                .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::MissingValue("storage.path".to_string()));
        }

        if self.map.first_fix_extent_m.is_nan() || self.map.first_fix_extent_m <= 0.0 {
            return Err(ConfigError::out_of_range(
                "map.first_fix_extent_m",
                self.map.first_fix_extent_m,
            ));
        }
        if self.map.vertex_pick_tolerance_deg.is_nan() || self.map.vertex_pick_tolerance_deg <= 0.0 {
            return Err(ConfigError::out_of_range(
                "map.vertex_pick_tolerance_deg",
                self.map.vertex_pick_tolerance_deg,
            ));
        }

        Ok(())
    }
}
