//! # Event Bus Module
//!
//! Publish/subscribe notifications between the controller and observers
//! such as the log sink.
//!
//! ```rust,ignore
//! use gpsmanager_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, PolygonEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Polygon]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//!
//! bus.publish(AppEvent::Polygon(PolygonEvent::Loaded { count: 3 })).ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
