use std::time::Duration;

use gpsmanager_core::GeoPoint;
use gpsmanager_location::{FeedEvent, PositionFeed, SimulatedFeed, SimulatedFeedConfig};

#[tokio::test(start_paused = true)]
async fn test_default_script() {
    let feed = SimulatedFeed::start(SimulatedFeedConfig::default());
    let mut events = feed.subscribe();
    assert!(!feed.is_connected());

    assert_eq!(events.recv().await.unwrap(), FeedEvent::Connected);
    assert!(feed.is_connected());

    match events.recv().await.unwrap() {
        FeedEvent::PositionReceived(fix) => {
            assert_eq!(fix.latitude, 55.046307);
            assert_eq!(fix.longitude, 82.963026);
        }
        other => panic!("expected a fix, got {:?}", other),
    }

    // Remaining events up to the scripted disconnect.
    loop {
        match events.recv().await.unwrap() {
            FeedEvent::PositionReceived(_) => continue,
            FeedEvent::Disconnected => break,
            FeedEvent::Connected => panic!("connected twice"),
        }
    }
    assert!(!feed.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_track_order() {
    let track = vec![
        GeoPoint::new(1.0, 1.0),
        GeoPoint::new(2.0, 2.0),
        GeoPoint::new(3.0, 3.0),
    ];
    let feed = SimulatedFeed::start(SimulatedFeedConfig {
        connect_delay: Duration::from_millis(10),
        disconnect_after: None,
        fix_interval: Duration::from_millis(100),
        track: track.clone(),
    });
    let mut events = feed.subscribe();
    assert_eq!(events.recv().await.unwrap(), FeedEvent::Connected);

    let mut seen = Vec::new();
    while seen.len() < 4 {
        if let FeedEvent::PositionReceived(fix) = events.recv().await.unwrap() {
            seen.push(fix.position());
        }
    }
    assert_eq!(seen, vec![track[0], track[1], track[2], track[0]]);
    feed.dispose();
}

#[tokio::test(start_paused = true)]
async fn test_dispose_while_connected() {
    let feed = SimulatedFeed::start(SimulatedFeedConfig {
        connect_delay: Duration::ZERO,
        disconnect_after: None,
        ..Default::default()
    });
    let mut events = feed.subscribe();
    assert_eq!(events.recv().await.unwrap(), FeedEvent::Connected);

    feed.dispose();
    assert!(!feed.is_connected());
    loop {
        match events.recv().await.unwrap() {
            FeedEvent::Disconnected => break,
            FeedEvent::PositionReceived(_) => continue,
            FeedEvent::Connected => panic!("reconnected after dispose"),
        }
    }

    // Second dispose is a no-op.
    feed.dispose();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dispose_before_connect() {
    let feed = SimulatedFeed::start(SimulatedFeedConfig::default());
    let mut events = feed.subscribe();
    feed.dispose();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(events.try_recv().is_err());
    assert!(!feed.is_connected());
}
