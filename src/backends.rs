//! Building the store and position feed selected in the configuration.

use std::time::Duration;

use anyhow::Context;
use gpsmanager_location::{PositionFeed, SimulatedFeed, SimulatedFeedConfig, TcpFeed, TcpFeedConfig};
use gpsmanager_polygons::{JsonFilePolygonStore, MemoryPolygonStore, PolygonStore};
use gpsmanager_settings::{FeedSettings, FeedSource, SimulatedFeedSettings, StorageBackend, StorageSettings};

pub fn simulated_config(settings: &SimulatedFeedSettings) -> SimulatedFeedConfig {
    SimulatedFeedConfig {
        connect_delay: Duration::from_millis(settings.connect_delay_ms),
        disconnect_after: (settings.disconnect_after_ms > 0)
            .then(|| Duration::from_millis(settings.disconnect_after_ms)),
        fix_interval: Duration::from_millis(settings.fix_interval_ms),
        track: settings.track.clone(),
    }
}

pub fn tcp_config(settings: &FeedSettings) -> TcpFeedConfig {
    TcpFeedConfig {
        host: settings.host.clone(),
        port: settings.port,
        connect_timeout: settings.connect_timeout(),
        reconnect: settings.reconnect,
        max_backoff: settings.max_backoff(),
        ..TcpFeedConfig::default()
    }
}

/// Start the configured feed on the current runtime.
pub fn start_feed(settings: &FeedSettings) -> Box<dyn PositionFeed> {
    tracing::info!(source = %settings.source, "Starting position feed");
    match settings.source {
        FeedSource::Simulated => Box::new(SimulatedFeed::start(simulated_config(&settings.simulated))),
        FeedSource::Tcp => Box::new(TcpFeed::start(tcp_config(settings))),
    }
}

pub fn open_store(settings: &StorageSettings) -> anyhow::Result<Box<dyn PolygonStore>> {
    match settings.backend {
        StorageBackend::Memory => Ok(Box::new(MemoryPolygonStore::new())),
        StorageBackend::File => {
            let path = settings
                .resolved_path()
                .context("No data directory for the polygon file")?;
            let store = JsonFilePolygonStore::open(&path)
                .with_context(|| format!("Failed to open polygon store {}", path.display()))?;
            tracing::info!(path = %path.display(), polygons = store.len(), "Polygon file opened");
            Ok(Box::new(store))
        }
    }
}
