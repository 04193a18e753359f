use std::time::Duration;

use gpsmanager_location::{FeedEvent, PositionFeed, TcpFeed, TcpFeedConfig};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::time::timeout;

const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

async fn recv(events: &mut tokio::sync::broadcast::Receiver<FeedEvent>) -> FeedEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}

fn config(port: u16, reconnect: bool) -> TcpFeedConfig {
    TcpFeedConfig {
        host: "127.0.0.1".to_string(),
        port,
        connect_timeout: Duration::from_secs(2),
        idle_timeout: None,
        reconnect,
        max_backoff: Duration::from_secs(1),
    }
}

#[tokio::test]
async fn test_receives_fixes_and_disconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let feed = TcpFeed::start(config(port, false));
    let mut events = feed.subscribe();

    let (mut socket, _) = listener.accept().await.unwrap();
    assert_eq!(recv(&mut events).await, FeedEvent::Connected);
    assert!(feed.is_connected());

    socket.write_all(b"$GPGSV,3,1,11,03,03,111,00*74\r\n").await.unwrap();
    socket.write_all(GGA.as_bytes()).await.unwrap();
    match recv(&mut events).await {
        FeedEvent::PositionReceived(fix) => {
            assert!((fix.latitude - 48.1173).abs() < 1e-9);
            assert_eq!(fix.altitude_m, Some(545.4));
        }
        other => panic!("expected fix, got {:?}", other),
    }

    drop(socket);
    assert_eq!(recv(&mut events).await, FeedEvent::Disconnected);
    assert!(!feed.is_connected());
}

#[tokio::test]
async fn test_overlong_line_is_dropped_and_stream_recovers() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let feed = TcpFeed::start(config(port, false));
    let mut events = feed.subscribe();

    let (mut socket, _) = listener.accept().await.unwrap();
    assert_eq!(recv(&mut events).await, FeedEvent::Connected);

    socket.write_all(&[b'x'; 4096]).await.unwrap();
    socket.write_all(GGA.as_bytes()).await.unwrap();
    socket.write_all(&[b'y'; 2048]).await.unwrap();
    socket.write_all(b"\r\n").await.unwrap();
    socket.write_all(GGA.as_bytes()).await.unwrap();

    for _ in 0..2 {
        match recv(&mut events).await {
            FeedEvent::PositionReceived(fix) => assert!((fix.latitude - 48.1173).abs() < 1e-9),
            other => panic!("expected fix, got {:?}", other),
        }
    }
    assert!(feed.is_connected());
}

#[tokio::test]
async fn test_reconnects_after_drop() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let feed = TcpFeed::start(config(port, true));
    let mut events = feed.subscribe();

    let (first, _) = listener.accept().await.unwrap();
    assert_eq!(recv(&mut events).await, FeedEvent::Connected);
    drop(first);
    assert_eq!(recv(&mut events).await, FeedEvent::Disconnected);

    let (_second, _) = timeout(Duration::from_secs(5), listener.accept())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recv(&mut events).await, FeedEvent::Connected);

    feed.dispose();
    assert_eq!(recv(&mut events).await, FeedEvent::Disconnected);
}

#[tokio::test]
async fn test_dispose_without_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let feed = TcpFeed::start(config(port, true));
    let mut events = feed.subscribe();
    tokio::time::sleep(Duration::from_millis(50)).await;
    feed.dispose();
    feed.dispose();
    assert!(!feed.is_connected());
    assert!(events.try_recv().is_err());
}
