//! Scripted position feed.
//!
//! Connects after a delay, walks a fixed track while connected, then drops
//! the connection. Useful without receiver hardware and in tests.

use std::sync::Arc;
use std::time::Duration;

use gpsmanager_core::{Fix, GeoPoint};
use tokio::time::{sleep, sleep_until, Instant};

use crate::feed::{FeedEvent, FeedHub, FeedState, PositionFeed};

/// Default delay before connecting.
pub const DEFAULT_CONNECT_DELAY: Duration = Duration::from_secs(2);

/// Default time connected before disconnecting.
pub const DEFAULT_DISCONNECT_AFTER: Duration = Duration::from_secs(4);

/// Default interval between track points.
pub const DEFAULT_FIX_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct SimulatedFeedConfig {
    pub connect_delay: Duration,
    /// `None` keeps the feed connected until disposed.
    pub disconnect_after: Option<Duration>,
    pub fix_interval: Duration,
    /// Positions reported in order, cycling when exhausted.
    pub track: Vec<GeoPoint>,
}

impl Default for SimulatedFeedConfig {
    fn default() -> Self {
        Self {
            connect_delay: DEFAULT_CONNECT_DELAY,
            disconnect_after: Some(DEFAULT_DISCONNECT_AFTER),
            fix_interval: DEFAULT_FIX_INTERVAL,
            track: vec![GeoPoint::new(55.046307, 82.963026)],
        }
    }
}

pub struct SimulatedFeed {
    hub: Arc<FeedHub>,
}

impl SimulatedFeed {
    /// Start the script on the current tokio runtime.
    pub fn start(config: SimulatedFeedConfig) -> Self {
        let hub = Arc::new(FeedHub::new("simulated"));
        let handle = tokio::spawn(run(hub.clone(), config));
        hub.attach_task(handle);
        Self { hub }
    }
}

async fn run(hub: Arc<FeedHub>, config: SimulatedFeedConfig) {
    tracing::info!(
        connect_delay_ms = config.connect_delay.as_millis() as u64,
        track_len = config.track.len(),
        "Simulated feed started"
    );
    sleep(config.connect_delay).await;
    hub.mark_connected();

    let deadline = config.disconnect_after.map(|d| Instant::now() + d);
    let mut track = config.track.iter().cycle();

    loop {
        if let Some(point) = track.next() {
            hub.publish_fix(Fix::from(*point));
        }
        match deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = sleep(config.fix_interval) => {}
                    _ = sleep_until(deadline) => break,
                }
            }
            None => sleep(config.fix_interval).await,
        }
    }

    hub.mark_disconnected();
    tracing::info!("Simulated feed finished");
}

impl PositionFeed for SimulatedFeed {
    fn name(&self) -> &str {
        self.hub.name()
    }

    fn is_connected(&self) -> bool {
        self.hub.is_connected()
    }

    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<FeedEvent> {
        self.hub.subscribe()
    }

    fn watch(&self) -> (FeedState, tokio::sync::broadcast::Receiver<FeedEvent>) {
        self.hub.watch()
    }

    fn dispose(&self) {
        self.hub.shutdown();
    }
}

impl Drop for SimulatedFeed {
    fn drop(&mut self) {
        self.hub.shutdown();
    }
}
