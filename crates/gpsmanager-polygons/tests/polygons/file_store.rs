use gpsmanager_core::{GeoPoint, Polygon, PolygonId, StorageError};
use gpsmanager_polygons::{JsonFilePolygonStore, PolygonStore};
use tempfile::TempDir;

fn triangle(name: &str) -> Polygon {
    Polygon::new(vec![
        GeoPoint::new(55.0, 82.0),
        GeoPoint::new(55.0, 82.1),
        GeoPoint::new(55.1, 82.0),
    ])
    .with_name(name)
}

#[test]
fn test_missing_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFilePolygonStore::open(dir.path().join("polygons.json")).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.backend(), "json-file");
}

#[test]
fn test_contents_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("polygons.json");

    let mut store = JsonFilePolygonStore::open(&path).unwrap();
    let mut a = triangle("north field");
    let mut b = triangle("south field");
    store.insert(&mut a).unwrap();
    store.insert(&mut b).unwrap();
    a.vertices[0] = GeoPoint::new(54.9, 81.9);
    assert!(store.update(&a).unwrap());
    assert!(store.remove(&b).unwrap());
    drop(store);

    let reopened = JsonFilePolygonStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 1);
    let stored = reopened.get(PolygonId(0)).unwrap();
    assert_eq!(stored.name, "north field");
    assert_eq!(stored.vertices[0], GeoPoint::new(54.9, 81.9));
}

#[test]
fn test_ids_continue_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("polygons.json");
    {
        let mut store = JsonFilePolygonStore::open(&path).unwrap();
        store.insert(&mut triangle("a")).unwrap();
        store.insert(&mut triangle("b")).unwrap();
    }
    let mut store = JsonFilePolygonStore::open(&path).unwrap();
    assert_eq!(store.insert(&mut triangle("c")).unwrap(), PolygonId(2));
}

#[test]
fn test_corrupted_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("polygons.json");
    std::fs::write(&path, "{ this is not json").unwrap();
    let err = JsonFilePolygonStore::open(&path).unwrap_err();
    assert!(matches!(err, StorageError::Corrupted { .. }));
}

#[test]
fn test_write_failure_rolls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("polygons.json");
    let mut store = JsonFilePolygonStore::open(&path).unwrap();
    let mut kept = triangle("kept");
    store.insert(&mut kept).unwrap();

    // A directory now occupies the document path, so the final rename fails.
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let mut p = triangle("doomed");
    let err = store.insert(&mut p).unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
    assert_eq!(store.len(), 1);
    assert_eq!(p.id, None);

    kept.name = "renamed".into();
    assert!(store.update(&kept).is_err());
    assert_eq!(store.get(PolygonId(0)).unwrap().name, "kept");

    assert!(store.remove(&kept).is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_insert_after_largest_possible_id_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("polygons.json");
    let json = format!(
        r#"{{"version":1,"polygons":[{{"id":{},"name":"edge","vertices":[]}}]}}"#,
        i64::MAX
    );
    std::fs::write(&path, &json).unwrap();

    let mut store = JsonFilePolygonStore::open(&path).unwrap();
    let mut p = triangle("overflow");
    let err = store.insert(&mut p).unwrap_err();
    assert!(matches!(err, StorageError::IdsExhausted { .. }));
    assert_eq!(p.id, None);
    assert_eq!(store.len(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), json);
}
