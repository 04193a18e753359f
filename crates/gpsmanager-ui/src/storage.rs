//! Store wrapper that keeps backend writes off the async workers.
//!
//! Mutating store calls may touch the disk. On a multi-thread runtime they
//! run under [`tokio::task::block_in_place`], which hands the worker's other
//! tasks (feed I/O, timers) to another thread for the duration of the call.
//! Reads are served from the backend's in-memory rows and run inline.

use gpsmanager_core::{Polygon, PolygonId};
use gpsmanager_polygons::{PolygonStore, StorageResult};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Run `f`, marking it as blocking when a multi-thread runtime is driving
/// the caller. Outside a runtime, or on a current-thread runtime, `f` runs
/// inline.
pub fn isolate_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

pub struct IsolatedStore {
    inner: Box<dyn PolygonStore>,
}

impl IsolatedStore {
    pub fn new(inner: Box<dyn PolygonStore>) -> Self {
        Self { inner }
    }
}

impl PolygonStore for IsolatedStore {
    fn insert(&mut self, polygon: &mut Polygon) -> StorageResult<PolygonId> {
        let inner = &mut self.inner;
        isolate_blocking(|| inner.insert(polygon))
    }

    fn remove(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        let inner = &mut self.inner;
        isolate_blocking(|| inner.remove(polygon))
    }

    fn update(&mut self, polygon: &Polygon) -> StorageResult<bool> {
        let inner = &mut self.inner;
        isolate_blocking(|| inner.update(polygon))
    }

    fn polygons(&self) -> &[Polygon] {
        self.inner.polygons()
    }

    fn backend(&self) -> &'static str {
        self.inner.backend()
    }
}
