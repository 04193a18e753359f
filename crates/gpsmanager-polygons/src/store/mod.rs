//! Polygon persistence.
//!
//! [`PolygonStore`] is the contract every backend satisfies:
//!
//! - `insert` assigns `max(existing ids) + 1`, or `0` for an empty store,
//!   so ids are never reused while a higher id exists.
//! - `remove` and `update` match by id and report absence as `false`.
//! - `polygons` yields stored polygons in insertion order.
//!
//! Backend failures surface as [`StorageError`]; the in-memory view of a
//! store is left as it was after the last successful call.

mod file;
mod memory;

pub use file::JsonFilePolygonStore;
pub use memory::MemoryPolygonStore;

use std::collections::HashSet;

use gpsmanager_core::{Polygon, PolygonId, StorageError};

pub type StorageResult<T> = Result<T, StorageError>;

pub trait PolygonStore: Send {
    /// Store `polygon` under a fresh id, writing the id back into it.
    fn insert(&mut self, polygon: &mut Polygon) -> StorageResult<PolygonId>;

    /// Remove the stored polygon with the same id.
    fn remove(&mut self, polygon: &Polygon) -> StorageResult<bool>;

    /// Replace the stored polygon with the same id.
    ///
    /// Identical content is a successful no-op.
    fn update(&mut self, polygon: &Polygon) -> StorageResult<bool>;

    fn polygons(&self) -> &[Polygon];

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    fn get(&self, id: PolygonId) -> Option<&Polygon> {
        self.polygons().iter().find(|p| p.id == Some(id))
    }

    fn len(&self) -> usize {
        self.polygons().len()
    }

    fn is_empty(&self) -> bool {
        self.polygons().is_empty()
    }
}

/// Next id for a collection: one past the largest, or zero.
pub(crate) fn next_id(polygons: &[Polygon]) -> StorageResult<PolygonId> {
    match polygons.iter().filter_map(|p| p.id).max() {
        None => Ok(PolygonId(0)),
        Some(last) => last
            .next()
            .ok_or(StorageError::IdsExhausted { last: last.0 }),
    }
}

/// Check that every row carries an id and no id repeats.
pub(crate) fn validate_rows(rows: &[Polygon]) -> StorageResult<()> {
    let mut seen = HashSet::new();
    for polygon in rows {
        match polygon.id {
            Some(id) if seen.insert(id) => {}
            Some(id) => {
                return Err(StorageError::Corrupted {
                    reason: format!("duplicate polygon id {}", id),
                })
            }
            None => {
                return Err(StorageError::Corrupted {
                    reason: "polygon without id".to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Shared in-memory bookkeeping used by every backend.
///
/// Mutators return what the backend needs to persist or roll back.
#[derive(Debug, Default)]
pub(crate) struct PolygonTable {
    rows: Vec<Polygon>,
}

/// Outcome of [`PolygonTable::replace`].
pub(crate) enum Replace {
    Missing,
    Unchanged,
    Replaced { index: usize, previous: Polygon },
}

impl PolygonTable {
    pub(crate) fn from_rows(rows: Vec<Polygon>) -> Self {
        Self { rows }
    }

    pub(crate) fn rows(&self) -> &[Polygon] {
        &self.rows
    }

    pub(crate) fn append(&mut self, polygon: &mut Polygon) -> StorageResult<PolygonId> {
        let id = next_id(&self.rows)?;
        polygon.id = Some(id);
        let mut stored = polygon.clone();
        stored.highlighted = false;
        self.rows.push(stored);
        Ok(id)
    }

    pub(crate) fn undo_append(&mut self) {
        self.rows.pop();
    }

    pub(crate) fn take(&mut self, id: Option<PolygonId>) -> Option<(usize, Polygon)> {
        let id = id?;
        let index = self.rows.iter().position(|p| p.id == Some(id))?;
        Some((index, self.rows.remove(index)))
    }

    pub(crate) fn put_back(&mut self, index: usize, polygon: Polygon) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, polygon);
    }

    pub(crate) fn replace(&mut self, polygon: &Polygon) -> Replace {
        let Some(id) = polygon.id else {
            return Replace::Missing;
        };
        let Some(index) = self.rows.iter().position(|p| p.id == Some(id)) else {
            return Replace::Missing;
        };
        if self.rows[index].same_content(polygon) {
            return Replace::Unchanged;
        }
        let mut stored = polygon.clone();
        stored.highlighted = false;
        let previous = std::mem::replace(&mut self.rows[index], stored);
        Replace::Replaced { index, previous }
    }

    pub(crate) fn restore(&mut self, index: usize, previous: Polygon) {
        if let Some(row) = self.rows.get_mut(index) {
            *row = previous;
        }
    }
}
