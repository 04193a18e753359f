use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use gpsmanager::backends::{open_store, start_feed};
use gpsmanager::console::{
    read_commands, ConsoleOperator, ConsoleView, NameQueue, PolygonSnapshot, HELP,
};
use gpsmanager::{init_logging, App, MapController, SettingsManager, VERSION};
use gpsmanager_core::{EventBus, EventFilter};
use gpsmanager_ui::ControllerSettings;
use tokio::io::BufReader;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let settings = match std::env::args_os().nth(1) {
        Some(path) => SettingsManager::load_or_default(PathBuf::from(path)),
        None => SettingsManager::load_default_location(),
    }
    .context("Failed to load configuration")?;
    let config = settings.config().clone();
    tracing::info!(
        version = VERSION,
        config = %settings.config_path().display(),
        feed = %config.feed.source,
        "Starting GPSManager"
    );

    let bus = Arc::new(EventBus::new());
    bus.subscribe(EventFilter::All, |event| {
        tracing::info!(category = %event.category(), "{}", event.description());
    });

    let store = open_store(&config.storage)?;
    let names = NameQueue::default();
    let snapshot = PolygonSnapshot::default();
    let controller = MapController::new(
        store,
        ConsoleView::new(std::io::stdout(), snapshot.clone()),
        ConsoleOperator::new(std::io::stdout(), names.clone()),
        bus,
        ControllerSettings::from(&config),
    );
    let feed = start_feed(&config.feed);

    println!("{}", HELP);
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = read_commands(stdin, std::io::stdout(), tx, names, snapshot).await {
            tracing::error!(error = %e, "Console input failed");
        }
    });

    let controller = App::new(controller, feed).run(rx).await;
    tracing::info!(polygons = controller.store().len(), "GPSManager stopped");
    Ok(())
}
