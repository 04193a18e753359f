//! Interactive editing of a stored polygon.
//!
//! A session works on a copy of the target. Vertex operations mutate only
//! that copy; the store sees the result once, when the session ends.

use gpsmanager_core::{GeoPoint, Polygon, PolygonId, StorageError};

use crate::error::{EditError, EditResult};
use crate::geometry;
use crate::store::PolygonStore;

/// Result of [`PolygonEditTool::end_editing`].
#[derive(Debug)]
pub enum EditOutcome {
    /// No session was open; the store was not called.
    NotEditing,
    /// The store accepted the edited polygon.
    Saved(Polygon),
    /// The store no longer holds the polygon.
    TargetMissing(Polygon),
    /// The store failed; the edit was not persisted.
    Failed { polygon: Polygon, error: StorageError },
}

impl EditOutcome {
    /// True when a session was open and has now been closed.
    pub fn was_active(&self) -> bool {
        !matches!(self, EditOutcome::NotEditing)
    }

    pub fn polygon(&self) -> Option<&Polygon> {
        match self {
            EditOutcome::NotEditing => None,
            EditOutcome::Saved(p)
            | EditOutcome::TargetMissing(p)
            | EditOutcome::Failed { polygon: p, .. } => Some(p),
        }
    }
}

#[derive(Debug, Default)]
pub struct PolygonEditTool {
    target: Option<Polygon>,
}

impl PolygonEditTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session on a copy of `polygon`.
    pub fn begin_editing(&mut self, polygon: &Polygon) -> EditResult<()> {
        if let Some(current) = self.target.as_ref().and_then(|t| t.id) {
            return Err(EditError::SessionActive { current });
        }
        let Some(id) = polygon.id else {
            return Err(EditError::Unsaved);
        };
        let mut working = polygon.clone();
        working.highlighted = false;
        self.target = Some(working);
        tracing::debug!(polygon_id = %id, "Editing started");
        Ok(())
    }

    /// Close the session and hand the working copy to `store.update`.
    pub fn end_editing(&mut self, store: &mut dyn PolygonStore) -> EditOutcome {
        let Some(polygon) = self.target.take() else {
            return EditOutcome::NotEditing;
        };
        match store.update(&polygon) {
            Ok(true) => EditOutcome::Saved(polygon),
            Ok(false) => {
                tracing::warn!(polygon_id = ?polygon.id, "Edited polygon no longer in store");
                EditOutcome::TargetMissing(polygon)
            }
            Err(error) => EditOutcome::Failed { polygon, error },
        }
    }

    pub fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    /// The working copy under edit.
    pub fn target(&self) -> Option<&Polygon> {
        self.target.as_ref()
    }

    pub fn target_id(&self) -> Option<PolygonId> {
        self.target.as_ref().and_then(|t| t.id)
    }

    /// Index of the vertex closest to `point` within `tolerance`.
    pub fn pick_vertex(&self, point: GeoPoint, tolerance: f64) -> Option<usize> {
        let target = self.target.as_ref()?;
        geometry::nearest_vertex(&target.vertices, point, tolerance)
    }

    /// Move vertex `index` to `to`.
    pub fn drag_vertex(&mut self, index: usize, to: GeoPoint) -> EditResult<()> {
        let target = self.target.as_mut().ok_or(EditError::NotEditing)?;
        let len = target.vertices.len();
        let vertex = target
            .vertices
            .get_mut(index)
            .ok_or(EditError::VertexOutOfRange { index, len })?;
        *vertex = to;
        Ok(())
    }

    /// Insert a vertex after `after`.
    pub fn insert_vertex(&mut self, after: usize, point: GeoPoint) -> EditResult<()> {
        let target = self.target.as_mut().ok_or(EditError::NotEditing)?;
        let len = target.vertices.len();
        if after >= len {
            return Err(EditError::VertexOutOfRange { index: after, len });
        }
        target.vertices.insert(after + 1, point);
        Ok(())
    }

    /// Delete vertex `index`, keeping at least three.
    pub fn remove_vertex(&mut self, index: usize) -> EditResult<GeoPoint> {
        let target = self.target.as_mut().ok_or(EditError::NotEditing)?;
        let len = target.vertices.len();
        if index >= len {
            return Err(EditError::VertexOutOfRange { index, len });
        }
        if len <= Polygon::MIN_VERTICES {
            return Err(EditError::TooFewVertices {
                min: Polygon::MIN_VERTICES,
            });
        }
        Ok(target.vertices.remove(index))
    }
}
