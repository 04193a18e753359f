use gpsmanager_core::{Polygon, PolygonId};

use super::{validate_rows, PolygonStore, PolygonTable, Replace, StorageResult};

/// Volatile store; contents live for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryPolygonStore {
    table: PolygonTable,
}

impl MemoryPolygonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already identified polygons.
    ///
    /// Fails with `StorageError::Corrupted` when a polygon has no id or
    /// an id repeats.
    pub fn with_polygons(polygons: Vec<Polygon>) -> StorageResult<Self> {
        validate_rows(&polygons)?;
        Ok(Self {
            table: PolygonTable::from_rows(polygons),
        })
    }
}

impl PolygonStore for MemoryPolygonStore {
    fn insert(&mut self, polygon: &mut Polygon) -> StorageResult<PolygonId> {
        let id = self.table.append(polygon)?;
        tracing::debug!(polygon_id = %id, "Polygon inserted");
        Ok(id)
    }

    fn remove(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        Ok(self.table.take(polygon.id).is_some())
    }

    fn update(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        Ok(!matches!(self.table.replace(polygon), Replace::Missing))
    }

    fn polygons(&self) -> &[Polygon] {
        self.table.rows()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
