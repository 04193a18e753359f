//! Store, tools and layer working together.

use gpsmanager_core::{GeoPoint, PolygonId};
use gpsmanager_polygons::{
    EditOutcome, HitTester, MemoryPolygonStore, PolygonDrawTool, PolygonEditTool, PolygonLayer,
    PolygonStore,
};

#[test]
fn test_insert_remove_insert_scenario() {
    let mut store = MemoryPolygonStore::new();
    let mut draw = PolygonDrawTool::new();

    let mut drawn = Vec::new();
    for offset in [0.0, 10.0] {
        draw.begin_drawing();
        draw.add_point(GeoPoint::new(offset, 0.0));
        draw.add_point(GeoPoint::new(offset, 1.0));
        draw.add_point(GeoPoint::new(offset + 1.0, 0.0));
        let mut polygon = draw.end_drawing().unwrap();
        store.insert(&mut polygon).unwrap();
        drawn.push(polygon);
    }
    assert_eq!(drawn[0].id, Some(PolygonId(0)));
    assert_eq!(drawn[1].id, Some(PolygonId(1)));

    assert!(store.remove(&drawn[0]).unwrap());

    draw.begin_drawing();
    for p in [(20.0, 0.0), (20.0, 1.0), (21.0, 0.0)] {
        draw.add_point(GeoPoint::new(p.0, p.1));
    }
    let mut third = draw.end_drawing().unwrap();
    assert_eq!(store.insert(&mut third).unwrap(), PolygonId(2));
}

#[test]
fn test_edit_round_trip_updates_once() {
    let mut store = MemoryPolygonStore::new();
    let mut draw = PolygonDrawTool::new();
    draw.begin_drawing();
    for p in [(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)] {
        draw.add_point(GeoPoint::new(p.0, p.1));
    }
    let mut polygon = draw.end_drawing().unwrap();
    store.insert(&mut polygon).unwrap();

    let mut layer = PolygonLayer::new();
    layer.add_range(store.polygons().to_vec());

    let hit = HitTester::find_at(&layer, GeoPoint::new(1.0, 1.0));
    assert_eq!(hit.len(), 1);
    let target = hit[0].clone();

    let mut edit = PolygonEditTool::new();
    edit.begin_editing(&target).unwrap();
    let outcome = edit.end_editing(&mut store);
    assert!(outcome.was_active());
    assert!(matches!(outcome, EditOutcome::Saved(ref p) if p.same_content(&target)));
    assert!(!edit.end_editing(&mut store).was_active());
}
