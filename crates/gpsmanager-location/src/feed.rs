//! Position feed contract and the shared connection state machine.

use gpsmanager_core::Fix;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Default capacity of a feed's event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Notifications emitted by a position feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Connected,
    Disconnected,
    PositionReceived(Fix),
}

/// Connection state of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedState {
    #[default]
    Disconnected,
    Connected,
}

/// A source of position fixes with a connection lifecycle.
///
/// Events are delivered on the feed's own tasks; consumers that mutate UI
/// state must forward them onto their UI loop. Dropping a receiver
/// unsubscribes it.
pub trait PositionFeed: Send + Sync {
    /// Short name used in logs and status events.
    fn name(&self) -> &str;

    fn is_connected(&self) -> bool;

    fn subscribe(&self) -> broadcast::Receiver<FeedEvent>;

    /// Subscribe and read the current state in one step.
    ///
    /// Every event on the returned receiver happened after the returned
    /// state, so a consumer that joins late still sees a consistent
    /// connection status.
    fn watch(&self) -> (FeedState, broadcast::Receiver<FeedEvent>);

    /// Stop the feed and release its connection. Safe to call repeatedly
    /// and from any state.
    fn dispose(&self);
}

/// Connection bookkeeping shared by feed implementations.
///
/// Connect/disconnect events are emitted only on an actual state change,
/// and fixes only while connected. Events are sent while the state lock is
/// held, so subscribers see them in the same order as the state changes.
#[derive(Debug)]
pub struct FeedHub {
    name: String,
    state: Mutex<FeedState>,
    sender: broadcast::Sender<FeedEvent>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FeedHub {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            name: name.into(),
            state: Mutex::new(FeedState::Disconnected),
            sender,
            task: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> FeedState {
        *self.state.lock()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == FeedState::Connected
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn watch(&self) -> (FeedState, broadcast::Receiver<FeedEvent>) {
        let state = self.state.lock();
        (*state, self.sender.subscribe())
    }

    /// Returns true if this call changed the state.
    pub fn mark_connected(&self) -> bool {
        self.transition(FeedState::Connected, FeedEvent::Connected)
    }

    /// Returns true if this call changed the state.
    pub fn mark_disconnected(&self) -> bool {
        self.transition(FeedState::Disconnected, FeedEvent::Disconnected)
    }

    fn transition(&self, to: FeedState, event: FeedEvent) -> bool {
        let mut state = self.state.lock();
        if *state == to {
            return false;
        }
        *state = to;
        let _ = self.sender.send(event);
        drop(state);
        tracing::info!(feed = %self.name, state = ?to, "Feed state changed");
        true
    }

    /// Publish a fix; dropped unless connected.
    pub fn publish_fix(&self, fix: Fix) -> bool {
        let state = self.state.lock();
        if *state != FeedState::Connected {
            drop(state);
            tracing::trace!(feed = %self.name, "Dropping fix while disconnected");
            return false;
        }
        let _ = self.sender.send(FeedEvent::PositionReceived(fix));
        drop(state);
        tracing::trace!(feed = %self.name, lat = fix.latitude, lon = fix.longitude, "Fix");
        true
    }

    /// Remember the I/O task so [`shutdown`](Self::shutdown) can stop it.
    pub fn attach_task(&self, handle: JoinHandle<()>) {
        if let Some(previous) = self.task.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Abort the I/O task and settle in `Disconnected`.
    pub fn shutdown(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
            tracing::debug!(
                feed = %self.name,
                subscribers = self.subscriber_count(),
                "Feed task aborted"
            );
        }
        self.mark_disconnected();
    }
}
