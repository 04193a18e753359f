//! Error types for the polygon tools.

use gpsmanager_core::PolygonId;
use thiserror::Error;

/// Misuse of the edit tool's session protocol or vertex operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A session is already open; it must be ended first.
    #[error("Already editing polygon {current}")]
    SessionActive {
        /// Id of the polygon being edited.
        current: PolygonId,
    },

    /// Vertex operation without an open session.
    #[error("No polygon is being edited")]
    NotEditing,

    /// Only stored polygons can be edited.
    #[error("Polygon has not been saved")]
    Unsaved,

    #[error("Vertex {index} out of range (polygon has {len} vertices)")]
    VertexOutOfRange { index: usize, len: usize },

    /// Removing a vertex would leave fewer than three.
    #[error("A polygon needs at least {min} vertices")]
    TooFewVertices { min: usize },
}

pub type EditResult<T> = Result<T, EditError>;
