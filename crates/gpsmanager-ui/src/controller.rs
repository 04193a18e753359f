//! Map controller.
//!
//! Owns the polygon store, the rendered layer and both interactive tools,
//! and applies the coordination rules between them:
//!
//! - drawing and editing are never active at the same time;
//! - a right-click first finalizes whatever session is open and only
//!   hit-tests when nothing was open;
//! - storage failures are reported to the operator and leave the layer as
//!   it was after the last successful store call;
//! - store writes run through [`IsolatedStore`] so a slow disk does not
//!   stall the runtime's other tasks.

use std::sync::Arc;

use gpsmanager_core::{
    AppEvent, ErrorEvent, EventBus, FeedStatusEvent, Fix, GeoPoint, Polygon, PolygonEvent,
    PolygonId, StorageError, ToolEvent,
};
use gpsmanager_location::FeedEvent;
use gpsmanager_polygons::{
    EditOutcome, HitTester, PolygonDrawTool, PolygonEditTool, PolygonLayer, PolygonStore,
};
use gpsmanager_settings::{Config, StatusSettings};

use crate::error::{ControllerError, ControllerResult};
use crate::menu::{Menu, MenuAction, MenuCommand, MenuKind};
use crate::operator::Operator;
use crate::storage::IsolatedStore;
use crate::view::{area_around, ConnectionStatus, MapView};

/// The slice of [`Config`] the controller reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub status: StatusSettings,
    pub first_fix_extent_m: f64,
    pub vertex_pick_tolerance: f64,
    pub persist_on_cancel: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            status: config.status.clone(),
            first_fix_extent_m: config.map.first_fix_extent_m,
            vertex_pick_tolerance: config.map.vertex_pick_tolerance_deg,
            persist_on_cancel: config.drawing.persist_on_cancel,
        }
    }
}

/// What a right-click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RightClickOutcome {
    /// A draw or edit session was open and has been finalized.
    SessionFinalized,
    /// Nothing under the cursor.
    NoHit,
    /// A menu was opened.
    Menu(Menu),
}

pub struct MapController<V: MapView, O: Operator> {
    store: Box<dyn PolygonStore>,
    layer: PolygonLayer,
    draw: PolygonDrawTool,
    edit: PolygonEditTool,
    open_menu: Option<Menu>,
    centered: bool,
    view: V,
    operator: O,
    bus: Arc<EventBus>,
    settings: ControllerSettings,
}

impl<V: MapView, O: Operator> MapController<V, O> {
    /// Load every stored polygon into the layer and show the initial
    /// disconnected status.
    pub fn new(
        store: Box<dyn PolygonStore>,
        view: V,
        operator: O,
        bus: Arc<EventBus>,
        settings: ControllerSettings,
    ) -> Self {
        let mut layer = PolygonLayer::new();
        let count = layer.add_range(store.polygons().iter().cloned());
        layer.refresh();
        tracing::info!(count, backend = store.backend(), "Polygons loaded");

        let mut controller = Self {
            store: Box::new(IsolatedStore::new(store)),
            layer,
            draw: PolygonDrawTool::new(),
            edit: PolygonEditTool::new(),
            open_menu: None,
            centered: false,
            view,
            operator,
            bus,
            settings,
        };
        controller.render();
        let status = ConnectionStatus::from_settings(&controller.settings.status, false);
        controller.view.show_connection_status(&status);
        controller.publish(AppEvent::Polygon(PolygonEvent::Loaded { count }));
        controller
    }

    pub fn layer(&self) -> &PolygonLayer {
        &self.layer
    }

    pub fn store(&self) -> &dyn PolygonStore {
        self.store.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_drawing()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    /// Id of the polygon under edit.
    pub fn editing(&self) -> Option<PolygonId> {
        self.edit.target_id()
    }

    pub fn open_menu(&self) -> Option<&Menu> {
        self.open_menu.as_ref()
    }

    // ---- pointer input ----

    pub fn on_left_click(&mut self, point: GeoPoint) {
        if self.draw.add_point(point) {
            self.view.show_draw_preview(self.draw.preview());
            return;
        }
        self.dismiss_menu();
        if self.layer.unhighlight_all() > 0 {
            self.refresh_layer();
        }
    }

    pub fn on_right_click(&mut self, point: GeoPoint) -> RightClickOutcome {
        self.dismiss_menu();
        let unhighlighted = self.layer.unhighlight_all();

        let drew = self.finish_drawing(true);
        let edited = self.finish_editing();
        if drew || edited {
            if unhighlighted > 0 && !edited {
                self.refresh_layer();
            }
            return RightClickOutcome::SessionFinalized;
        }

        let hits: Vec<&Polygon> = HitTester::find_at(&self.layer, point);
        let menu = match hits.as_slice() {
            [] => None,
            [single] => Menu::actions(single),
            many => Some(Menu::disambiguation(many.iter().copied())),
        };
        tracing::debug!(hits = hits.len(), %point, "Hit test");

        let outcome = match menu {
            Some(menu) => {
                if let MenuKind::Actions { target } = menu.kind {
                    self.layer.set_highlighted(target, true);
                }
                self.present_menu(menu.clone());
                RightClickOutcome::Menu(menu)
            }
            None => RightClickOutcome::NoHit,
        };
        if unhighlighted > 0 || matches!(outcome, RightClickOutcome::Menu(_)) {
            self.refresh_layer();
        }
        outcome
    }

    /// Escape: finalize an open draw session, keeping the polygon only when
    /// configured to. Returns whether a session was open.
    pub fn on_cancel(&mut self) -> bool {
        if self.open_menu.is_some() {
            self.dismiss_menu();
            if self.layer.unhighlight_all() > 0 {
                self.refresh_layer();
            }
        }
        self.finish_drawing(self.settings.persist_on_cancel)
    }

    /// Draw control toggled by the operator.
    pub fn set_draw_control(&mut self, active: bool) {
        if active {
            self.dismiss_menu();
            self.finish_editing();
            self.draw.begin_drawing();
            self.view.show_draw_preview(&[]);
            tracing::info!("Drawing started");
            self.publish(AppEvent::Tool(ToolEvent::DrawingStarted));
        } else {
            self.finish_drawing(true);
        }
    }

    // ---- drawing ----

    /// End the draw session, committing the polygon when `commit` is set.
    fn finish_drawing(&mut self, commit: bool) -> bool {
        if !self.draw.is_drawing() {
            return false;
        }
        let polygon = self.draw.end_drawing();
        self.view.set_draw_control(false);
        self.view.show_draw_preview(&[]);

        let committed = match polygon {
            Some(polygon) if commit => self.commit(polygon),
            Some(polygon) => {
                tracing::info!(vertices = polygon.vertices.len(), "Drawing discarded");
                false
            }
            None => {
                tracing::debug!("Drawing ended with too few vertices");
                false
            }
        };
        self.publish(AppEvent::Tool(ToolEvent::DrawingFinished { committed }));
        true
    }

    fn commit(&mut self, mut polygon: Polygon) -> bool {
        if let Some(name) = self.operator.prompt_polygon_name(&polygon) {
            polygon.name = name;
        }
        match self.store.insert(&mut polygon) {
            Ok(id) => {
                tracing::info!(polygon_id = %id, name = %polygon.display_name(), "Polygon saved");
                let name = polygon.name.clone();
                self.layer.upsert(polygon);
                self.refresh_layer();
                self.publish(AppEvent::Polygon(PolygonEvent::Inserted { id, name }));
                true
            }
            Err(e) => {
                self.report_storage_error("insert", &e);
                false
            }
        }
    }

    // ---- editing ----

    /// Open an edit session on a stored polygon.
    ///
    /// Rejected while drawing. A session on another polygon is finalized
    /// first; asking for the polygon already under edit is a no-op.
    pub fn begin_editing(&mut self, id: PolygonId) -> ControllerResult<()> {
        if self.draw.is_drawing() {
            return Err(ControllerError::DrawSessionActive);
        }
        if self.edit.target_id() == Some(id) {
            return Ok(());
        }
        let polygon = self
            .store
            .get(id)
            .cloned()
            .ok_or(ControllerError::PolygonNotFound(id))?;
        self.finish_editing();
        self.edit.begin_editing(&polygon)?;
        tracing::info!(polygon_id = %id, "Editing started");
        self.publish(AppEvent::Tool(ToolEvent::EditingStarted { id }));
        Ok(())
    }

    /// End the edit session and persist the working copy.
    fn finish_editing(&mut self) -> bool {
        let outcome = self.edit.end_editing(self.store.as_mut());
        let Some(id) = outcome.polygon().and_then(|p| p.id) else {
            return false;
        };
        match outcome {
            EditOutcome::NotEditing => {}
            EditOutcome::Saved(polygon) => {
                tracing::info!(polygon_id = %id, "Polygon updated");
                self.layer.upsert(polygon);
                self.publish(AppEvent::Polygon(PolygonEvent::Updated { id }));
            }
            EditOutcome::TargetMissing(_) => {
                self.layer.try_remove(id);
            }
            EditOutcome::Failed { error, .. } => {
                // show the last stored geometry again
                if let Some(stored) = self.store.get(id).cloned() {
                    self.layer.upsert(stored);
                }
                self.report_storage_error("update", &error);
            }
        }
        self.refresh_layer();
        self.publish(AppEvent::Tool(ToolEvent::EditingFinished { id }));
        true
    }

    /// Vertex of the polygon under edit near `point`.
    pub fn pick_vertex(&self, point: GeoPoint) -> Option<usize> {
        self.edit.pick_vertex(point, self.settings.vertex_pick_tolerance)
    }

    pub fn drag_vertex(&mut self, index: usize, to: GeoPoint) -> ControllerResult<()> {
        self.edit.drag_vertex(index, to)?;
        self.mirror_working_copy();
        Ok(())
    }

    pub fn insert_vertex(&mut self, after: usize, point: GeoPoint) -> ControllerResult<()> {
        self.edit.insert_vertex(after, point)?;
        self.mirror_working_copy();
        Ok(())
    }

    pub fn remove_vertex(&mut self, index: usize) -> ControllerResult<()> {
        self.edit.remove_vertex(index)?;
        self.mirror_working_copy();
        Ok(())
    }

    fn mirror_working_copy(&mut self) {
        if let Some(working) = self.edit.target().cloned() {
            self.layer.upsert(working);
            self.refresh_layer();
        }
    }

    // ---- menus ----

    /// Pointer entered or left menu item `index`.
    ///
    /// In a disambiguation menu the hovered polygon is highlighted while the
    /// pointer is over its item.
    pub fn hover_menu_item(&mut self, index: usize, hovered: bool) -> ControllerResult<()> {
        let menu = self.open_menu.as_ref().ok_or(ControllerError::NoMenuOpen)?;
        let item = menu.item(index).ok_or(ControllerError::MenuItemOutOfRange {
            index,
            len: menu.len(),
        })?;
        if menu.kind == MenuKind::Disambiguation {
            let target = item.command.target;
            if self.layer.set_highlighted(target, hovered) {
                self.refresh_layer();
            }
        }
        Ok(())
    }

    /// Choose item `index` of the open menu. Returns the follow-up menu, if
    /// the command opened one.
    pub fn select_menu_item(&mut self, index: usize) -> ControllerResult<Option<Menu>> {
        let menu = self.open_menu.as_ref().ok_or(ControllerError::NoMenuOpen)?;
        let command = menu
            .item(index)
            .map(|item| item.command)
            .ok_or(ControllerError::MenuItemOutOfRange {
                index,
                len: menu.len(),
            })?;
        self.dismiss_menu();
        self.execute(command)
    }

    /// Run a menu command record.
    pub fn execute(&mut self, command: MenuCommand) -> ControllerResult<Option<Menu>> {
        let MenuCommand { action, target } = command;
        tracing::debug!(?action, polygon_id = %target, "Menu command");
        match action {
            MenuAction::Open => {
                let menu = self
                    .layer
                    .get(target)
                    .and_then(Menu::actions)
                    .ok_or(ControllerError::PolygonNotFound(target))?;
                self.layer.unhighlight_all();
                self.layer.set_highlighted(target, true);
                self.refresh_layer();
                self.present_menu(menu.clone());
                Ok(Some(menu))
            }
            MenuAction::Edit => {
                self.begin_editing(target)?;
                self.layer.unhighlight_all();
                self.refresh_layer();
                Ok(None)
            }
            MenuAction::Rename => {
                self.rename(target)?;
                Ok(None)
            }
            MenuAction::Remove => {
                self.remove(target)?;
                Ok(None)
            }
        }
    }

    fn rename(&mut self, id: PolygonId) -> ControllerResult<()> {
        if self.edit.target_id() == Some(id) {
            self.finish_editing();
        }
        let mut polygon = self
            .store
            .get(id)
            .cloned()
            .ok_or(ControllerError::PolygonNotFound(id))?;
        let Some(name) = self.operator.prompt_polygon_name(&polygon) else {
            return Ok(());
        };
        polygon.name = name;
        polygon.highlighted = self.layer.get(id).is_some_and(|p| p.highlighted);

        match self.store.update(&polygon) {
            Ok(true) => {
                let name = polygon.name.clone();
                self.layer.upsert(polygon);
                self.refresh_layer();
                tracing::info!(polygon_id = %id, %name, "Polygon renamed");
                self.publish(AppEvent::Polygon(PolygonEvent::Renamed { id, name }));
            }
            Ok(false) => {
                tracing::warn!(polygon_id = %id, "Renamed polygon no longer in store");
                if self.layer.try_remove(id) {
                    self.refresh_layer();
                }
            }
            Err(e) => self.report_storage_error("update", &e),
        }
        Ok(())
    }

    fn remove(&mut self, id: PolygonId) -> ControllerResult<()> {
        if self.edit.target_id() == Some(id) {
            self.finish_editing();
        }
        let polygon = self
            .store
            .get(id)
            .cloned()
            .ok_or(ControllerError::PolygonNotFound(id))?;
        match self.store.remove(&polygon) {
            Ok(true) => {
                self.layer.try_remove(id);
                self.refresh_layer();
                tracing::info!(polygon_id = %id, "Polygon removed");
                self.publish(AppEvent::Polygon(PolygonEvent::Removed { id }));
            }
            Ok(false) => tracing::warn!(polygon_id = %id, "Polygon already gone from store"),
            Err(e) => self.report_storage_error("remove", &e),
        }
        Ok(())
    }

    fn present_menu(&mut self, menu: Menu) {
        self.operator.show_menu(&menu);
        self.open_menu = Some(menu);
    }

    fn dismiss_menu(&mut self) {
        if self.open_menu.take().is_some() {
            self.operator.close_menu();
        }
    }

    // ---- position feed ----

    pub fn on_feed_event(&mut self, feed: &str, event: &FeedEvent) {
        match event {
            FeedEvent::Connected | FeedEvent::Disconnected => {
                let connected = matches!(event, FeedEvent::Connected);
                let status = ConnectionStatus::from_settings(&self.settings.status, connected);
                self.view.show_connection_status(&status);
                let feed = feed.to_string();
                self.publish(AppEvent::Feed(if connected {
                    FeedStatusEvent::Connected { feed }
                } else {
                    FeedStatusEvent::Disconnected { feed }
                }));
            }
            FeedEvent::PositionReceived(fix) => self.view.move_position_marker(fix),
        }
    }

    /// Zoom to the area around the session's first fix. Later calls are
    /// ignored.
    pub fn center_on_first_fix(&mut self, fix: &Fix) {
        if self.centered {
            return;
        }
        self.centered = true;
        let area = area_around(fix.position(), self.settings.first_fix_extent_m);
        tracing::info!(latitude = fix.latitude, longitude = fix.longitude, "Centering on first fix");
        self.view.zoom_to(&area);
        self.publish(AppEvent::Feed(FeedStatusEvent::FirstFix {
            latitude: fix.latitude,
            longitude: fix.longitude,
        }));
    }

    // ---- lifecycle ----

    /// Close down: the edit session is saved, an unfinished drawing is
    /// dropped.
    pub fn shutdown(&mut self) {
        self.dismiss_menu();
        self.finish_editing();
        if self.draw.is_drawing() {
            let pending = self.draw.preview().len();
            self.draw.cancel();
            self.view.set_draw_control(false);
            self.view.show_draw_preview(&[]);
            if pending > 0 {
                tracing::warn!(pending, "Discarding unfinished drawing on shutdown");
            }
            self.publish(AppEvent::Tool(ToolEvent::DrawingFinished { committed: false }));
        }
        tracing::info!(polygons = self.store.len(), "Map controller shut down");
    }

    fn refresh_layer(&mut self) {
        self.layer.refresh();
        self.render();
    }

    fn render(&mut self) {
        self.view.render(&self.layer);
    }

    fn report_storage_error(&mut self, operation: &str, error: &StorageError) {
        tracing::error!(operation, error = %error, "Storage operation failed");
        self.operator
            .report_error("Storage error", &format!("Could not {} polygon: {}", operation, error));
        self.publish(AppEvent::Error(ErrorEvent::Storage {
            operation: operation.to_string(),
            message: error.to_string(),
        }));
    }

    fn publish(&self, event: AppEvent) {
        self.bus.publish(event);
    }
}
