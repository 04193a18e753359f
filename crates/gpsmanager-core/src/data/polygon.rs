use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Label shown for polygons whose name is blank.
pub const UNNAMED_POLYGON_LABEL: &str = "<unnamed polygon>";

/// Store-assigned polygon identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonId(pub i64);

impl PolygonId {
    /// The identifier following this one, or `None` at `i64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(PolygonId)
    }
}

impl std::fmt::Display for PolygonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named closed region on the map.
///
/// `id` stays `None` until a store inserts the polygon. `highlighted` is a
/// transient rendering flag and is never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(default)]
    pub id: Option<PolygonId>,
    #[serde(default)]
    pub name: String,
    pub vertices: Vec<GeoPoint>,
    #[serde(skip)]
    pub highlighted: bool,
}

impl Polygon {
    /// Minimum vertex count of a valid polygon.
    pub const MIN_VERTICES: usize = 3;

    /// Create an unsaved, unnamed polygon.
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Self {
            id: None,
            name: String::new(),
            vertices,
            highlighted: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// True when the polygon has enough vertices to enclose an area.
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= Self::MIN_VERTICES
    }

    /// Name for menus and logs; blank names render as a placeholder.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            UNNAMED_POLYGON_LABEL
        } else {
            &self.name
        }
    }

    /// Compare persisted content, ignoring the highlight flag.
    pub fn same_content(&self, other: &Polygon) -> bool {
        self.id == other.id && self.name == other.name && self.vertices == other.vertices
    }
}
