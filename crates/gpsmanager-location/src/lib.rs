//! # GPSManager Location
//!
//! Position feeds and their connection lifecycle.
//!
//! Every feed implements [`PositionFeed`] and reports through a
//! [`FeedHub`]: `Connected` and `Disconnected` once per transition, and
//! `PositionReceived` only while connected. Two variants exist:
//!
//! - [`SimulatedFeed`]: a scripted track for offline use
//! - [`TcpFeed`]: NMEA GGA sentences from a network receiver
//!
//! [`first_fix`] turns a subscription into a one-shot receiver for the
//! first reported position.

pub mod feed;
pub mod first_fix;
pub mod nmea;
pub mod simulated;
pub mod tcp;

pub use feed::{FeedEvent, FeedHub, FeedState, PositionFeed};
pub use first_fix::{first_fix, next_fix};
pub use nmea::{parse_gga, FixQuality, GgaSentence, NmeaError};
pub use simulated::{SimulatedFeed, SimulatedFeedConfig};
pub use tcp::{TcpFeed, TcpFeedConfig};
