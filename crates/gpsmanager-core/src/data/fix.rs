use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A single position reading from a location feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude above mean sea level in meters, when reported.
    pub altitude_m: Option<f64>,
    /// UTC time of the fix as reported by the receiver.
    pub utc_time: Option<NaiveTime>,
    /// Satellites used in the solution, when reported.
    pub satellites: Option<u8>,
    /// Local time the reading was received.
    pub received_at: DateTime<Utc>,
}

impl Fix {
    /// Fix carrying only a position, stamped now.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m: None,
            utc_time: None,
            satellites: None,
            received_at: Utc::now(),
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl From<GeoPoint> for Fix {
    fn from(point: GeoPoint) -> Self {
        Fix::new(point.latitude, point.longitude)
    }
}
