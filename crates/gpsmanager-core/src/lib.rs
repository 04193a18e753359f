//! # GPSManager Core
//!
//! Core types and utilities for GPSManager.
//! Provides the position and polygon data model, the error taxonomy shared
//! by every layer, and the application event bus.

pub mod data;
pub mod error;
pub mod event_bus;

pub use data::{Fix, GeoPoint, Polygon, PolygonId, UNNAMED_POLYGON_LABEL};

pub use error::{FeedError, StorageError};

// Re-export event bus for convenience
pub use event_bus::{
    AppEvent, ErrorEvent, EventBus, EventBusConfig, EventCategory, EventFilter, FeedStatusEvent,
    PolygonEvent, SubscriptionId, ToolEvent,
};
