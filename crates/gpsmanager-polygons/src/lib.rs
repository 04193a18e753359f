//! # GPSManager Polygons
//!
//! Everything about polygon regions short of drawing them on screen:
//!
//! - [`store`]: the persistence contract with in-memory and JSON file backends
//! - [`PolygonDrawTool`] and [`PolygonEditTool`]: the interactive session state machines
//! - [`PolygonLayer`]: the rendered feature set, with highlight state
//! - [`HitTester`]: which polygons lie under a map point

pub mod draw_tool;
pub mod edit_tool;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod spatial_index;
pub mod store;

pub use draw_tool::{DrawState, PolygonDrawTool};
pub use edit_tool::{EditOutcome, PolygonEditTool};
pub use error::{EditError, EditResult};
pub use hit_test::HitTester;
pub use layer::PolygonLayer;
pub use spatial_index::{Bounds, SpatialIndex};
pub use store::{JsonFilePolygonStore, MemoryPolygonStore, PolygonStore, StorageResult};
