//! Interactive polygon drawing.
//!
//! The tool collects clicked vertices while a session is open and hands
//! back an unsaved [`Polygon`] when the session ends with enough points.
//! It never touches a store; committing is the caller's decision.

use gpsmanager_core::{GeoPoint, Polygon};

/// Draw tool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing,
}

#[derive(Debug, Default)]
pub struct PolygonDrawTool {
    state: DrawState,
    pending: Vec<GeoPoint>,
}

impl PolygonDrawTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session. An already open session is restarted with an empty
    /// buffer.
    pub fn begin_drawing(&mut self) {
        if self.state == DrawState::Drawing && !self.pending.is_empty() {
            tracing::debug!(
                discarded = self.pending.len(),
                "Restarting draw session, pending vertices dropped"
            );
        }
        self.pending.clear();
        self.state = DrawState::Drawing;
    }

    /// Append a vertex; ignored outside a session.
    pub fn add_point(&mut self, point: GeoPoint) -> bool {
        if self.state != DrawState::Drawing {
            return false;
        }
        self.pending.push(point);
        true
    }

    /// Close the session.
    ///
    /// Returns a polygon with the collected vertices in click order when at
    /// least three were placed, otherwise `None`. The tool is idle
    /// afterwards in both cases.
    pub fn end_drawing(&mut self) -> Option<Polygon> {
        if self.state != DrawState::Drawing {
            return None;
        }
        self.state = DrawState::Idle;
        let vertices = std::mem::take(&mut self.pending);
        if vertices.len() < Polygon::MIN_VERTICES {
            tracing::debug!(vertices = vertices.len(), "Draw session ended without a polygon");
            return None;
        }
        Some(Polygon::new(vertices))
    }

    /// End the session and drop whatever it produced.
    pub fn cancel(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        self.end_drawing();
        was_drawing
    }

    pub fn is_drawing(&self) -> bool {
        self.state == DrawState::Drawing
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Vertices placed so far in the open session.
    pub fn preview(&self) -> &[GeoPoint] {
        &self.pending
    }
}
