//! # GPSManager UI
//!
//! Map controller and event loop. The controller applies the interaction
//! rules between the polygon store, the rendered layer and the draw/edit
//! tools; front ends plug in through the [`MapView`] and [`Operator`]
//! traits and feed operator input to [`App::run`].

pub mod app;
pub mod controller;
pub mod error;
pub mod menu;
pub mod operator;
pub mod storage;
pub mod view;

pub use app::{App, InputEvent};
pub use controller::{ControllerSettings, MapController, RightClickOutcome};
pub use error::{ControllerError, ControllerResult};
pub use menu::{Menu, MenuAction, MenuCommand, MenuItem, MenuKind};
pub use operator::Operator;
pub use storage::{isolate_blocking, IsolatedStore};
pub use view::{area_around, ConnectionStatus, MapView};
