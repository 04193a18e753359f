use std::time::Duration;

use gpsmanager_core::Fix;
use gpsmanager_location::{
    first_fix, next_fix, FeedHub, PositionFeed, SimulatedFeed, SimulatedFeedConfig,
};

#[tokio::test(start_paused = true)]
async fn test_resolves_with_first_fix_only() {
    let feed = SimulatedFeed::start(SimulatedFeedConfig {
        connect_delay: Duration::from_millis(50),
        ..Default::default()
    });
    let fix = first_fix(feed.subscribe()).await.unwrap();
    assert_eq!(fix.position(), SimulatedFeedConfig::default().track[0]);
    feed.dispose();
}

#[tokio::test]
async fn test_next_fix_skips_connection_events() {
    let hub = FeedHub::new("test");
    let mut rx = hub.subscribe();
    hub.mark_connected();
    hub.publish_fix(Fix::new(10.0, 20.0));
    hub.publish_fix(Fix::new(11.0, 21.0));

    assert_eq!(next_fix(&mut rx).await.unwrap().latitude, 10.0);
    assert_eq!(next_fix(&mut rx).await.unwrap().latitude, 11.0);
}

#[tokio::test]
async fn test_closed_feed_yields_none() {
    let hub = FeedHub::new("test");
    let rx = hub.subscribe();
    let pending = first_fix(rx);
    drop(hub);
    assert!(pending.await.is_err());
}

#[tokio::test]
async fn test_dropping_receiver_releases_subscription() {
    let hub = FeedHub::new("test");
    let pending = first_fix(hub.subscribe());
    tokio::task::yield_now().await;
    assert_eq!(hub.subscriber_count(), 1);

    drop(pending);
    for _ in 0..10 {
        if hub.subscriber_count() == 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(hub.subscriber_count(), 0);
}

#[tokio::test]
async fn test_lagged_receiver_recovers() {
    let hub = FeedHub::with_capacity("test", 2);
    let mut rx = hub.subscribe();
    hub.mark_connected();
    for i in 0..10 {
        hub.publish_fix(Fix::new(i as f64, 0.0));
    }
    // Only the two newest fixes survive the overflow.
    assert_eq!(next_fix(&mut rx).await.unwrap().latitude, 8.0);
    assert_eq!(next_fix(&mut rx).await.unwrap().latitude, 9.0);
    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}
