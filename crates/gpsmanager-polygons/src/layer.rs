//! Rendering-side polygon feature set.
//!
//! The layer mirrors what the map draws: stored polygons plus the live
//! working copy of a polygon under edit. It carries highlight flags and a
//! revision counter the view watches to know when to redraw.

use gpsmanager_core::{Polygon, PolygonId};

use crate::spatial_index::{Bounds, SpatialIndex};

#[derive(Debug, Default)]
pub struct PolygonLayer {
    features: Vec<Polygon>,
    index: SpatialIndex,
    revision: u64,
}

impl PolygonLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-add features; polygons without an id are skipped.
    pub fn add_range<I>(&mut self, polygons: I) -> usize
    where
        I: IntoIterator<Item = Polygon>,
    {
        polygons
            .into_iter()
            .map(|p| self.upsert(p))
            .filter(|added| *added)
            .count()
    }

    /// Insert a feature or replace the one with the same id in place.
    pub fn upsert(&mut self, polygon: Polygon) -> bool {
        let Some(id) = polygon.id else {
            tracing::warn!(name = %polygon.display_name(), "Ignoring layer feature without id");
            return false;
        };
        if let Some(bounds) = Bounds::from_points(&polygon.vertices) {
            self.index.insert(id, bounds);
        } else {
            self.index.remove(id);
        }
        match self.features.iter_mut().find(|f| f.id == Some(id)) {
            Some(existing) => *existing = polygon,
            None => self.features.push(polygon),
        }
        true
    }

    /// Remove the feature with `id`; returns false when it was not present.
    pub fn try_remove(&mut self, id: PolygonId) -> bool {
        self.index.remove(id);
        let before = self.features.len();
        self.features.retain(|f| f.id != Some(id));
        self.features.len() != before
    }

    pub fn clear(&mut self) {
        self.features.clear();
        self.index.clear();
    }

    /// Signal that the rendered data changed.
    pub fn refresh(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn features(&self) -> &[Polygon] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, id: PolygonId) -> Option<&Polygon> {
        self.features.iter().find(|f| f.id == Some(id))
    }

    /// Features whose bounding box meets `view`, in layer order.
    ///
    /// `resolution` is the map-units-per-pixel of the request; the query
    /// area is grown by one pixel so edge-adjacent features are included.
    pub fn features_in_view(&self, view: &Bounds, resolution: f64) -> Vec<&Polygon> {
        let area = view.expanded(resolution.max(0.0));
        let ids = self.index.query(&area);
        self.features
            .iter()
            .filter(|f| f.id.is_some_and(|id| ids.contains(&id)))
            .collect()
    }

    pub fn set_highlighted(&mut self, id: PolygonId, highlighted: bool) -> bool {
        match self.features.iter_mut().find(|f| f.id == Some(id)) {
            Some(feature) => {
                feature.highlighted = highlighted;
                true
            }
            None => false,
        }
    }

    /// Clear every highlight; returns how many features changed.
    pub fn unhighlight_all(&mut self) -> usize {
        let mut changed = 0;
        for feature in self.features.iter_mut().filter(|f| f.highlighted) {
            feature.highlighted = false;
            changed += 1;
        }
        changed
    }

    pub fn highlighted_ids(&self) -> Vec<PolygonId> {
        self.features
            .iter()
            .filter(|f| f.highlighted)
            .filter_map(|f| f.id)
            .collect()
    }
}
