//! Awaiting fixes from a feed subscription.

use gpsmanager_core::Fix;
use tokio::sync::{broadcast, oneshot};

use crate::feed::FeedEvent;

/// Wait for the next `PositionReceived` on `events`.
///
/// Connection events are skipped and a lagged receiver keeps going.
/// Returns `None` once the feed's channel is closed.
pub async fn next_fix(events: &mut broadcast::Receiver<FeedEvent>) -> Option<Fix> {
    loop {
        match events.recv().await {
            Ok(FeedEvent::PositionReceived(fix)) => return Some(fix),
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Fix receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

/// Resolve once, with the first fix seen on `events`.
///
/// The subscription is dropped as soon as the fix arrives. If the feed goes
/// away first, or the returned receiver is dropped, the helper task simply
/// ends and the receiver yields an error.
pub fn first_fix(mut events: broadcast::Receiver<FeedEvent>) -> oneshot::Receiver<Fix> {
    let (mut tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        tokio::select! {
            fix = next_fix(&mut events) => {
                if let Some(fix) = fix {
                    let _ = tx.send(fix);
                }
            }
            _ = tx.closed() => {}
        }
    });
    rx
}
