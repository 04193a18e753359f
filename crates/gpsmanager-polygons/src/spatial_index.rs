//! Bounding-box index used for view queries and hit-test prefiltering.

use gpsmanager_core::{GeoPoint, PolygonId};

/// Axis-aligned rectangle in planar (longitude, latitude) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    /// Smallest bounds enclosing every point, or `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Bounds::new(first.x(), first.y(), first.x(), first.y());
        for p in &points[1..] {
            b.min_x = b.min_x.min(p.x());
            b.min_y = b.min_y.min(p.y());
            b.max_x = b.max_x.max(p.x());
            b.max_y = b.max_y.max(p.y());
        }
        Some(b)
    }

    /// Degenerate bounds around a single point.
    pub fn around(point: GeoPoint) -> Self {
        Bounds::new(point.x(), point.y(), point.x(), point.y())
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Grow every side by `margin`.
    pub fn expanded(&self, margin: f64) -> Self {
        Bounds::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }
}

/// Ordered collection of polygon bounding boxes.
///
/// Queries return ids in insertion order so callers get deterministic
/// results.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    entries: Vec<(PolygonId, Bounds)>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the bounds for `id`, keeping its original position.
    pub fn insert(&mut self, id: PolygonId, bounds: Bounds) {
        match self.entries.iter_mut().find(|(eid, _)| *eid == id) {
            Some(entry) => entry.1 = bounds,
            None => self.entries.push((id, bounds)),
        }
    }

    pub fn remove(&mut self, id: PolygonId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids whose bounds intersect `area`.
    pub fn query(&self, area: &Bounds) -> Vec<PolygonId> {
        self.entries
            .iter()
            .filter(|(_, b)| b.intersects(area))
            .map(|(id, _)| *id)
            .collect()
    }
}
