use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
///
/// Planar geometry treats `longitude` as x and `latitude` as y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Planar x coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.longitude
    }

    /// Planar y coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.latitude
    }

    /// Planar distance in degrees.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        (self.x() - other.x()).hypot(self.y() - other.y())
    }

    /// True when both components are finite and within WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
