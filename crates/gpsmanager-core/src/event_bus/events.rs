//! Event type definitions for the event bus.
//!
//! Events are grouped by category and are cloneable and serializable so
//! they can be logged or replayed.

use serde::{Deserialize, Serialize};

use crate::data::PolygonId;

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Position feed lifecycle
    Feed(FeedStatusEvent),
    /// Polygon store and layer changes
    Polygon(PolygonEvent),
    /// Draw/edit tool transitions
    Tool(ToolEvent),
    /// Error and diagnostic events
    Error(ErrorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Feed(_) => EventCategory::Feed,
            AppEvent::Polygon(_) => EventCategory::Polygon,
            AppEvent::Tool(_) => EventCategory::Tool,
            AppEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Feed(e) => e.description(),
            AppEvent::Polygon(e) => e.description(),
            AppEvent::Tool(e) => e.description(),
            AppEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Feed,
    Polygon,
    Tool,
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Feed => write!(f, "Feed"),
            EventCategory::Polygon => write!(f, "Polygon"),
            EventCategory::Tool => write!(f, "Tool"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Position feed status changes as seen by the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FeedStatusEvent {
    /// Feed reached the connected state.
    Connected {
        /// Feed name.
        feed: String,
    },
    /// Feed lost or closed its connection.
    Disconnected {
        /// Feed name.
        feed: String,
    },
    /// Map was centered on the first fix of the session.
    FirstFix {
        latitude: f64,
        longitude: f64,
    },
}

impl FeedStatusEvent {
    pub fn description(&self) -> String {
        match self {
            FeedStatusEvent::Connected { feed } => format!("Feed {} connected", feed),
            FeedStatusEvent::Disconnected { feed } => format!("Feed {} disconnected", feed),
            FeedStatusEvent::FirstFix {
                latitude,
                longitude,
            } => format!("First fix at {:.6}, {:.6}", latitude, longitude),
        }
    }
}

/// Polygon lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PolygonEvent {
    /// A drawn polygon was committed to the store.
    Inserted { id: PolygonId, name: String },
    /// Vertex edits were persisted.
    Updated { id: PolygonId },
    /// Polygon name changed.
    Renamed { id: PolygonId, name: String },
    /// Polygon was removed from the store.
    Removed { id: PolygonId },
    /// Polygons loaded from the store at startup.
    Loaded { count: usize },
}

impl PolygonEvent {
    pub fn description(&self) -> String {
        match self {
            PolygonEvent::Inserted { id, name } => format!("Polygon {} inserted ({})", id, name),
            PolygonEvent::Updated { id } => format!("Polygon {} updated", id),
            PolygonEvent::Renamed { id, name } => format!("Polygon {} renamed to {}", id, name),
            PolygonEvent::Removed { id } => format!("Polygon {} removed", id),
            PolygonEvent::Loaded { count } => format!("{} polygons loaded", count),
        }
    }
}

/// Tool state transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ToolEvent {
    DrawingStarted,
    /// Drawing ended; `committed` is false when the session produced nothing.
    DrawingFinished { committed: bool },
    EditingStarted { id: PolygonId },
    EditingFinished { id: PolygonId },
}

impl ToolEvent {
    pub fn description(&self) -> String {
        match self {
            ToolEvent::DrawingStarted => "Drawing started".to_string(),
            ToolEvent::DrawingFinished { committed } => {
                format!("Drawing finished (committed: {})", committed)
            }
            ToolEvent::EditingStarted { id } => format!("Editing polygon {}", id),
            ToolEvent::EditingFinished { id } => format!("Finished editing polygon {}", id),
        }
    }
}

/// Errors surfaced to the operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// A store operation failed.
    Storage {
        /// The operation being attempted.
        operation: String,
        /// Error message.
        message: String,
    },
}

impl ErrorEvent {
    pub fn description(&self) -> String {
        match self {
            ErrorEvent::Storage { operation, message } => {
                format!("Storage error during {}: {}", operation, message)
            }
        }
    }
}
