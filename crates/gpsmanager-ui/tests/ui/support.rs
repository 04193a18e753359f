//! Recording fakes for the view and operator seams.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gpsmanager_core::{
    AppEvent, EventBus, EventBusConfig, Fix, GeoPoint, Polygon, PolygonId, StorageError,
};
use gpsmanager_polygons::{Bounds, MemoryPolygonStore, PolygonLayer, PolygonStore, StorageResult};
use gpsmanager_ui::{ConnectionStatus, ControllerSettings, MapController, MapView, Menu, Operator};

#[derive(Debug, Default)]
pub struct RecordingView {
    pub renders: usize,
    pub rendered: Vec<Polygon>,
    pub preview: Vec<GeoPoint>,
    pub draw_control: Option<bool>,
    pub statuses: Vec<ConnectionStatus>,
    pub markers: Vec<Fix>,
    pub zooms: Vec<Bounds>,
}

impl MapView for RecordingView {
    fn render(&mut self, layer: &PolygonLayer) {
        self.renders += 1;
        self.rendered = layer.features().to_vec();
    }

    fn show_draw_preview(&mut self, vertices: &[GeoPoint]) {
        self.preview = vertices.to_vec();
    }

    fn set_draw_control(&mut self, active: bool) {
        self.draw_control = Some(active);
    }

    fn show_connection_status(&mut self, status: &ConnectionStatus) {
        self.statuses.push(status.clone());
    }

    fn move_position_marker(&mut self, fix: &Fix) {
        self.markers.push(*fix);
    }

    fn zoom_to(&mut self, area: &Bounds) {
        self.zooms.push(*area);
    }
}

/// Answers name prompts from a queue; an empty queue cancels the prompt.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    pub names: VecDeque<Option<String>>,
    pub prompts: usize,
    pub errors: Vec<(String, String)>,
    pub menus: Vec<Menu>,
    pub closed_menus: usize,
}

impl ScriptedOperator {
    pub fn answering<I: IntoIterator<Item = &'static str>>(names: I) -> Self {
        Self {
            names: names.into_iter().map(|n| Some(n.to_string())).collect(),
            ..Self::default()
        }
    }
}

impl Operator for ScriptedOperator {
    fn prompt_polygon_name(&mut self, _polygon: &Polygon) -> Option<String> {
        self.prompts += 1;
        self.names.pop_front().flatten()
    }

    fn report_error(&mut self, title: &str, message: &str) {
        self.errors.push((title.to_string(), message.to_string()));
    }

    fn show_menu(&mut self, menu: &Menu) {
        self.menus.push(menu.clone());
    }

    fn close_menu(&mut self) {
        self.closed_menus += 1;
    }
}

/// Memory store whose calls can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryPolygonStore,
    pub failing: Arc<AtomicBool>,
    pub updates: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn with_polygons(polygons: Vec<Polygon>) -> Self {
        Self {
            inner: MemoryPolygonStore::with_polygons(polygons).expect("valid seed"),
            ..Self::default()
        }
    }

    fn check(&self) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::unavailable("disk unplugged"))
        } else {
            Ok(())
        }
    }
}

impl PolygonStore for FlakyStore {
    fn insert(&mut self, polygon: &mut Polygon) -> StorageResult<PolygonId> {
        self.check()?;
        self.inner.insert(polygon)
    }

    fn remove(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        self.check()?;
        self.inner.remove(polygon)
    }

    fn update(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.update(polygon)
    }

    fn polygons(&self) -> &[Polygon] {
        self.inner.polygons()
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

/// Memory store whose inserts block the calling thread, recording how far
/// a shared tick counter advanced meanwhile.
#[derive(Debug, Default)]
pub struct SlowStore {
    inner: MemoryPolygonStore,
    delay: Duration,
    ticks: Arc<AtomicUsize>,
    pub ticks_during_insert: Arc<AtomicUsize>,
}

impl SlowStore {
    pub fn new(delay: Duration, ticks: Arc<AtomicUsize>) -> Self {
        Self {
            delay,
            ticks,
            ..Self::default()
        }
    }
}

impl PolygonStore for SlowStore {
    fn insert(&mut self, polygon: &mut Polygon) -> StorageResult<PolygonId> {
        let before = self.ticks.load(Ordering::SeqCst);
        std::thread::sleep(self.delay);
        let advanced = self.ticks.load(Ordering::SeqCst) - before;
        self.ticks_during_insert.store(advanced, Ordering::SeqCst);
        self.inner.insert(polygon)
    }

    fn remove(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        self.inner.remove(polygon)
    }

    fn update(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        self.inner.update(polygon)
    }

    fn polygons(&self) -> &[Polygon] {
        self.inner.polygons()
    }

    fn backend(&self) -> &'static str {
        "slow"
    }
}

/// Axis-aligned square with its south-west corner at (`lat`, `lon`).
pub fn square(id: i64, name: &str, lat: f64, lon: f64, size: f64) -> Polygon {
    let mut polygon = Polygon::new(vec![
        GeoPoint::new(lat, lon),
        GeoPoint::new(lat + size, lon),
        GeoPoint::new(lat + size, lon + size),
        GeoPoint::new(lat, lon + size),
    ])
    .with_name(name);
    polygon.id = Some(PolygonId(id));
    polygon
}

pub fn history_bus() -> Arc<EventBus> {
    Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..EventBusConfig::default()
    }))
}

pub type TestController = MapController<RecordingView, ScriptedOperator>;

pub fn build(
    store: impl PolygonStore + 'static,
    operator: ScriptedOperator,
) -> (TestController, Arc<EventBus>) {
    let bus = history_bus();
    let controller = MapController::new(
        Box::new(store),
        RecordingView::default(),
        operator,
        bus.clone(),
        ControllerSettings::default(),
    );
    (controller, bus)
}

pub fn events(bus: &EventBus) -> Vec<String> {
    bus.history().iter().map(AppEvent::description).collect()
}
