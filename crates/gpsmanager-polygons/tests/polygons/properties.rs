use gpsmanager_core::{GeoPoint, Polygon, PolygonId};
use gpsmanager_polygons::{
    HitTester, MemoryPolygonStore, PolygonDrawTool, PolygonLayer, PolygonStore,
};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = GeoPoint> {
    (-80.0f64..80.0, -170.0f64..170.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
}

proptest! {
    #[test]
    fn draw_keeps_every_vertex_in_order(points in prop::collection::vec(point(), 3..40)) {
        let mut tool = PolygonDrawTool::new();
        tool.begin_drawing();
        for p in &points {
            tool.add_point(*p);
        }
        let polygon = tool.end_drawing().expect("three or more points");
        prop_assert_eq!(polygon.vertices, points);
        prop_assert_eq!(polygon.id, None);
        prop_assert!(!tool.is_drawing());
    }

    #[test]
    fn draw_below_three_yields_none(points in prop::collection::vec(point(), 0..3)) {
        let mut tool = PolygonDrawTool::new();
        tool.begin_drawing();
        for p in &points {
            tool.add_point(*p);
        }
        prop_assert!(tool.end_drawing().is_none());
        prop_assert!(!tool.is_drawing());
    }

    #[test]
    fn inserted_ids_are_fresh(ops in prop::collection::vec(any::<bool>(), 1..60)) {
        let mut store = MemoryPolygonStore::new();
        let mut live: Vec<Polygon> = Vec::new();
        for insert in ops {
            if insert || live.is_empty() {
                let mut p = Polygon::new(vec![GeoPoint::default(); 3]);
                let id = store.insert(&mut p).unwrap();
                prop_assert!(live.iter().all(|q| q.id != Some(id)));
                live.push(p);
            } else {
                let victim = live.remove(0);
                prop_assert!(store.remove(&victim).unwrap());
            }
        }
        prop_assert_eq!(store.len(), live.len());
    }

    #[test]
    fn centre_of_square_always_hits(lat in -60.0f64..60.0, lon in -160.0f64..160.0, size in 0.001f64..5.0) {
        let mut p = Polygon::new(vec![
            GeoPoint::new(lat, lon),
            GeoPoint::new(lat, lon + size),
            GeoPoint::new(lat + size, lon + size),
            GeoPoint::new(lat + size, lon),
        ]);
        p.id = Some(PolygonId(0));
        let mut layer = PolygonLayer::new();
        layer.add_range(vec![p]);
        let centre = GeoPoint::new(lat + size / 2.0, lon + size / 2.0);
        prop_assert_eq!(HitTester::ids_at(&layer, centre), vec![PolygonId(0)]);
        let outside = GeoPoint::new(lat + size * 2.0, lon);
        prop_assert!(HitTester::find_at(&layer, outside).is_empty());
    }
}
