//! Locating, loading and saving the configuration file.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};

const APP_DIR: &str = "gpsmanager";
const CONFIG_FILE: &str = "config.toml";

/// Owns the active configuration and where it lives on disk.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config: Config,
    config_path: PathBuf,
}

impl SettingsManager {
    /// Platform config directory, e.g. `~/.config/gpsmanager` on Linux.
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| SettingsError::ConfigDirectory("no config directory on this platform".into()))
    }

    pub fn default_config_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    ///
    /// A file that exists but cannot be parsed or validated is an error.
    pub fn load_or_default(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let config_path = path.into();
        let config = if config_path.exists() {
            let config = Config::load_from_file(&config_path)?;
            tracing::info!(path = %config_path.display(), "Loaded configuration");
            config
        } else {
            tracing::info!(path = %config_path.display(), "No configuration file, using defaults");
            Config::default()
        };
        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load from the platform default location.
    pub fn load_default_location() -> SettingsResult<Self> {
        Self::load_or_default(Self::default_config_path()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write the configuration, creating the parent directory if needed.
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
        }
        self.config.save_to_file(&self.config_path)
    }
}
