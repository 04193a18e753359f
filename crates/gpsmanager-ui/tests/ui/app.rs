use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gpsmanager_core::{GeoPoint, PolygonId};
use gpsmanager_location::{PositionFeed, SimulatedFeed, SimulatedFeedConfig};
use gpsmanager_polygons::MemoryPolygonStore;
use gpsmanager_ui::{App, InputEvent};
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::support::{build, square, ScriptedOperator, SlowStore};

fn quiet_feed() -> SimulatedFeed {
    SimulatedFeed::start(SimulatedFeedConfig {
        connect_delay: Duration::from_secs(3600),
        disconnect_after: None,
        ..SimulatedFeedConfig::default()
    })
}

#[tokio::test(start_paused = true)]
async fn test_feed_drives_status_marker_and_first_fix() {
    let track = vec![GeoPoint::new(55.0, 83.0), GeoPoint::new(55.001, 83.001)];
    let feed = SimulatedFeed::start(SimulatedFeedConfig {
        connect_delay: Duration::from_secs(2),
        disconnect_after: None,
        fix_interval: Duration::from_secs(1),
        track,
    });
    let (controller, _bus) = build(MemoryPolygonStore::new(), ScriptedOperator::default());
    let app = App::new(controller, Box::new(feed));

    let (tx, rx) = mpsc::channel(8);
    let driver = async move {
        sleep(Duration::from_millis(4500)).await;
        tx.send(InputEvent::Close).await.unwrap();
    };
    let (controller, ()) = tokio::join!(app.run(rx), driver);

    let view = controller.view();
    let connected: Vec<bool> = view.statuses.iter().map(|s| s.connected).collect();
    assert_eq!(connected, [false, true]);
    assert_eq!(view.markers.len(), 3);
    assert_eq!(view.zooms.len(), 1);
    let (lon, lat) = view.zooms[0].center();
    assert!((lat - 55.0).abs() < 1e-9);
    assert!((lon - 83.0).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_feed_connected_before_run_shows_connected() {
    let feed = SimulatedFeed::start(SimulatedFeedConfig {
        connect_delay: Duration::ZERO,
        disconnect_after: None,
        ..SimulatedFeedConfig::default()
    });
    sleep(Duration::from_millis(10)).await;
    assert!(feed.is_connected());

    let (controller, _bus) = build(MemoryPolygonStore::new(), ScriptedOperator::default());
    let app = App::new(controller, Box::new(feed));
    let (tx, rx) = mpsc::channel(8);
    let driver = async move {
        sleep(Duration::from_millis(3500)).await;
        tx.send(InputEvent::Close).await.unwrap();
    };
    let (controller, ()) = tokio::join!(app.run(rx), driver);

    let connected: Vec<bool> = controller.view().statuses.iter().map(|s| s.connected).collect();
    assert_eq!(connected, [false, true]);
    assert!(!controller.view().markers.is_empty());
    assert_eq!(controller.view().zooms.len(), 1);
}

#[tokio::test]
async fn test_inputs_draw_and_commit() {
    let (controller, _bus) = build(MemoryPolygonStore::new(), ScriptedOperator::answering(["Lot"]));
    let app = App::new(controller, Box::new(quiet_feed()));

    let (tx, rx) = mpsc::channel(16);
    for event in [
        InputEvent::DrawToggled(true),
        InputEvent::LeftClick(GeoPoint::new(0.0, 0.0)),
        InputEvent::LeftClick(GeoPoint::new(0.0, 1.0)),
        InputEvent::LeftClick(GeoPoint::new(1.0, 0.0)),
        InputEvent::RightClick(GeoPoint::new(5.0, 5.0)),
        InputEvent::Close,
    ] {
        tx.try_send(event).unwrap();
    }

    let controller = app.run(rx).await;

    assert_eq!(controller.store().len(), 1);
    assert_eq!(controller.store().get(PolygonId(0)).unwrap().name, "Lot");
}

#[tokio::test]
async fn test_rejected_input_does_not_stop_loop() {
    let store = MemoryPolygonStore::with_polygons(vec![square(0, "A", 0.0, 0.0, 1.0)]).unwrap();
    let (controller, _bus) = build(store, ScriptedOperator::default());
    let app = App::new(controller, Box::new(quiet_feed()));

    let (tx, rx) = mpsc::channel(16);
    for event in [
        InputEvent::DrawToggled(true),
        // rejected while drawing
        InputEvent::Edit(PolygonId(0)),
        InputEvent::MenuSelect(0),
        InputEvent::Cancel,
        InputEvent::Edit(PolygonId(0)),
        InputEvent::DragVertex {
            from: GeoPoint::new(0.0, 0.0),
            to: GeoPoint::new(-1.0, -1.0),
        },
    ] {
        tx.try_send(event).unwrap();
    }
    drop(tx);

    let controller = app.run(rx).await;

    // closing the input channel shuts down and saves the edit
    assert!(!controller.is_editing());
    assert_eq!(
        controller.store().get(PolygonId(0)).unwrap().vertices[0],
        GeoPoint::new(-1.0, -1.0)
    );
}

#[tokio::test]
async fn test_close_discards_unfinished_drawing() {
    let (controller, _bus) = build(MemoryPolygonStore::new(), ScriptedOperator::default());
    let app = App::new(controller, Box::new(quiet_feed()));

    let (tx, rx) = mpsc::channel(8);
    tx.try_send(InputEvent::DrawToggled(true)).unwrap();
    tx.try_send(InputEvent::LeftClick(GeoPoint::new(0.0, 0.0)))
        .unwrap();
    tx.try_send(InputEvent::Close).unwrap();

    let controller = app.run(rx).await;

    assert!(!controller.is_drawing());
    assert!(controller.store().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn test_slow_store_write_does_not_stall_other_tasks() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = {
        let ticks = ticks.clone();
        tokio::spawn(async move {
            loop {
                sleep(Duration::from_millis(10)).await;
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        })
    };
    let store = SlowStore::new(Duration::from_millis(300), ticks);
    let ticks_during_insert = store.ticks_during_insert.clone();
    let (controller, _bus) = build(store, ScriptedOperator::answering(["Slow"]));
    let app = App::new(controller, Box::new(quiet_feed()));

    let (tx, rx) = mpsc::channel(16);
    for event in [
        InputEvent::DrawToggled(true),
        InputEvent::LeftClick(GeoPoint::new(0.0, 0.0)),
        InputEvent::LeftClick(GeoPoint::new(0.0, 1.0)),
        InputEvent::LeftClick(GeoPoint::new(1.0, 0.0)),
        InputEvent::DrawToggled(false),
        InputEvent::Close,
    ] {
        tx.try_send(event).unwrap();
    }

    // The loop shares the single worker with the ticker.
    let controller = tokio::spawn(app.run(rx)).await.unwrap();
    ticker.abort();

    assert_eq!(controller.store().len(), 1);
    assert!(ticks_during_insert.load(Ordering::SeqCst) >= 5);
}
