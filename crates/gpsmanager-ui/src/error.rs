//! Errors returned by controller operations.

use gpsmanager_core::PolygonId;
use gpsmanager_polygons::EditError;
use thiserror::Error;

/// Rejected operator requests.
///
/// Storage failures are not here: the controller reports those to the
/// operator directly and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Editing cannot start while a polygon is being drawn.
    #[error("Finish drawing before editing a polygon")]
    DrawSessionActive,

    #[error("Polygon {0} not found")]
    PolygonNotFound(PolygonId),

    #[error("No menu is open")]
    NoMenuOpen,

    #[error("Menu item {index} out of range ({len} items)")]
    MenuItemOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Edit(#[from] EditError),
}

pub type ControllerResult<T> = Result<T, ControllerError>;
