//! Application event loop.
//!
//! Every controller mutation happens on the task running [`App::run`]:
//! operator input, feed events and the first-fix notification are all
//! funneled through one `select!` loop.

use gpsmanager_core::{GeoPoint, PolygonId};
use gpsmanager_location::{first_fix, FeedEvent, FeedState, PositionFeed};
use tokio::sync::{broadcast, mpsc};

use crate::controller::MapController;
use crate::error::ControllerResult;
use crate::operator::Operator;
use crate::view::MapView;

/// Operator input forwarded from the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    LeftClick(GeoPoint),
    RightClick(GeoPoint),
    /// Escape key.
    Cancel,
    DrawToggled(bool),
    /// Grab the vertex near `from` on the polygon being edited and move
    /// it to `to`.
    DragVertex { from: GeoPoint, to: GeoPoint },
    MenuHover { index: usize, hovered: bool },
    MenuSelect(usize),
    Edit(PolygonId),
    Close,
}

pub struct App<V: MapView, O: Operator> {
    controller: MapController<V, O>,
    feed: Box<dyn PositionFeed>,
}

impl<V: MapView, O: Operator> App<V, O> {
    pub fn new(controller: MapController<V, O>, feed: Box<dyn PositionFeed>) -> Self {
        Self { controller, feed }
    }

    pub fn controller(&self) -> &MapController<V, O> {
        &self.controller
    }

    /// Process events until `Close` arrives or every input sender is gone,
    /// then dispose the feed and shut the controller down.
    ///
    /// Returns the controller so the caller can inspect the final state.
    pub async fn run(mut self, mut inputs: mpsc::Receiver<InputEvent>) -> MapController<V, O> {
        let feed_name = self.feed.name().to_string();
        let (state, mut feed_events) = self.feed.watch();
        let mut feed_open = true;
        let mut first = Some(first_fix(self.feed.subscribe()));
        tracing::info!(feed = %feed_name, ?state, "Event loop started");
        if state == FeedState::Connected {
            self.controller.on_feed_event(&feed_name, &FeedEvent::Connected);
        }

        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(InputEvent::Close) | None => break,
                    Some(event) => self.dispatch(event),
                },
                event = feed_events.recv(), if feed_open => match event {
                    Ok(event) => self.controller.on_feed_event(&feed_name, &event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Feed events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Feed channel closed");
                        feed_open = false;
                    }
                },
                fix = async {
                    match first.as_mut() {
                        Some(rx) => rx.await,
                        None => std::future::pending().await,
                    }
                }, if first.is_some() => {
                    first = None;
                    match fix {
                        Ok(fix) => self.controller.center_on_first_fix(&fix),
                        Err(_) => tracing::debug!("Feed closed before the first fix"),
                    }
                }
            }
        }

        tracing::info!("Event loop stopping");
        self.feed.dispose();
        self.controller.shutdown();
        self.controller
    }

    fn dispatch(&mut self, event: InputEvent) {
        tracing::trace!(?event, "Input");
        if let Err(e) = self.apply(event) {
            tracing::warn!(error = %e, "Input rejected");
        }
    }

    fn apply(&mut self, event: InputEvent) -> ControllerResult<()> {
        let controller = &mut self.controller;
        match event {
            InputEvent::LeftClick(point) => controller.on_left_click(point),
            InputEvent::RightClick(point) => {
                controller.on_right_click(point);
            }
            InputEvent::Cancel => {
                controller.on_cancel();
            }
            InputEvent::DrawToggled(active) => controller.set_draw_control(active),
            InputEvent::DragVertex { from, to } => match controller.pick_vertex(from) {
                Some(index) => controller.drag_vertex(index, to)?,
                None => tracing::debug!(%from, "No vertex under pointer"),
            },
            InputEvent::MenuHover { index, hovered } => {
                controller.hover_menu_item(index, hovered)?
            }
            InputEvent::MenuSelect(index) => {
                controller.select_menu_item(index)?;
            }
            InputEvent::Edit(id) => controller.begin_editing(id)?,
            InputEvent::Close => {}
        }
        Ok(())
    }
}
