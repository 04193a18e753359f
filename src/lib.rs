//! # GPSManager
//!
//! Draw, edit, name and delete polygons on a map while a GPS position
//! feed moves a marker and reports connection status.
//!
//! ## Architecture
//!
//! GPSManager is organized as a workspace with multiple crates:
//!
//! 1. **gpsmanager-core** - Data model, errors, event bus
//! 2. **gpsmanager-polygons** - Polygon stores, draw/edit tools, layer, hit testing
//! 3. **gpsmanager-location** - Position feeds (simulated, NMEA over TCP)
//! 4. **gpsmanager-settings** - Configuration files
//! 5. **gpsmanager-ui** - Map controller and event loop
//! 6. **gpsmanager** - Console binary wiring it all together

pub mod backends;
pub mod console;

pub use gpsmanager_core::{Fix, GeoPoint, Polygon, PolygonId};
pub use gpsmanager_settings::{Config, SettingsManager};
pub use gpsmanager_ui::{App, InputEvent, MapController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable selecting the log format (`pretty` or `json`).
pub const LOG_FORMAT_ENV: &str = "GPSMANAGER_LOG_FORMAT";

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - stderr output, leaving stdout to the console front end
/// - RUST_LOG environment variable support, `info` by default
/// - pretty formatting, or JSON lines when `GPSMANAGER_LOG_FORMAT=json`
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true)
            .json();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
