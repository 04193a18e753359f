use std::fs;
use std::path::{Path, PathBuf};

use gpsmanager_core::{Polygon, PolygonId, StorageError};
use serde::{Deserialize, Serialize};

use super::{validate_rows, PolygonStore, PolygonTable, Replace, StorageResult};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Document {
    version: u32,
    polygons: Vec<Polygon>,
}

/// Durable store backed by a single JSON document.
///
/// Every successful mutation rewrites the document through a temporary
/// file and an atomic rename. When the write fails the in-memory change is
/// undone before the error is returned.
#[derive(Debug)]
pub struct JsonFilePolygonStore {
    path: PathBuf,
    table: PolygonTable,
}

impl JsonFilePolygonStore {
    /// Open the document at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let rows = match fs::read_to_string(&path) {
            Ok(content) => parse_document(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(path = %path.display(), polygons = rows.len(), "Opened polygon file");
        Ok(Self {
            path,
            table: PolygonTable::from_rows(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StorageResult<()> {
        let document = Document {
            version: FORMAT_VERSION,
            polygons: self.table.rows().to_vec(),
        };
        let content = serde_json::to_string_pretty(&document)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn parse_document(content: &str) -> StorageResult<Vec<Polygon>> {
    let document: Document =
        serde_json::from_str(content).map_err(|e| StorageError::Corrupted {
            reason: e.to_string(),
        })?;
    if document.version != FORMAT_VERSION {
        return Err(StorageError::Corrupted {
            reason: format!("unsupported format version {}", document.version),
        });
    }
    validate_rows(&document.polygons)?;
    Ok(document.polygons)
}

impl PolygonStore for JsonFilePolygonStore {
    fn insert(&mut self, polygon: &mut Polygon) -> StorageResult<PolygonId> {
        let previous_id = polygon.id;
        let id = self.table.append(polygon)?;
        if let Err(e) = self.persist() {
            self.table.undo_append();
            polygon.id = previous_id;
            tracing::error!(error = %e, path = %self.path.display(), "Failed to persist inserted polygon");
            return Err(e);
        }
        tracing::debug!(polygon_id = %id, "Polygon inserted");
        Ok(id)
    }

    fn remove(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        let Some((index, removed)) = self.table.take(polygon.id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist() {
            self.table.put_back(index, removed);
            tracing::error!(error = %e, path = %self.path.display(), "Failed to persist removal");
            return Err(e);
        }
        Ok(true)
    }

    fn update(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        match self.table.replace(polygon) {
            Replace::Missing => Ok(false),
            Replace::Unchanged => Ok(true),
            Replace::Replaced { index, previous } => {
                if let Err(e) = self.persist() {
                    self.table.restore(index, previous);
                    tracing::error!(error = %e, path = %self.path.display(), "Failed to persist update");
                    return Err(e);
                }
                Ok(true)
            }
        }
    }

    fn polygons(&self) -> &[Polygon] {
        self.table.rows()
    }

    fn backend(&self) -> &'static str {
        "json-file"
    }
}
