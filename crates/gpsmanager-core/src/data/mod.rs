//! Data model shared by the location and polygon layers.

mod fix;
mod geo;
mod polygon;

pub use fix::Fix;
pub use geo::GeoPoint;
pub use polygon::{Polygon, PolygonId, UNNAMED_POLYGON_LABEL};
