//! Map view contract.
//!
//! The controller drives whatever renders the map through [`MapView`]; a
//! graphical front end, the console binary and test recorders all implement
//! it.

use gpsmanager_core::{Fix, GeoPoint};
use gpsmanager_polygons::{Bounds, PolygonLayer};
use gpsmanager_settings::{Rgb, StatusSettings};

/// Meters per degree of latitude (mean).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Connection indicator contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub text: String,
    pub color: Rgb,
}

impl ConnectionStatus {
    pub fn from_settings(settings: &StatusSettings, connected: bool) -> Self {
        if connected {
            Self {
                connected,
                text: settings.connected_text.clone(),
                color: settings.connected_color,
            }
        } else {
            Self {
                connected,
                text: settings.disconnected_text.clone(),
                color: settings.disconnected_color,
            }
        }
    }
}

pub trait MapView {
    /// Redraw polygons; called after every layer change.
    fn render(&mut self, layer: &PolygonLayer);

    /// Vertices of the polygon being drawn; empty clears the preview.
    fn show_draw_preview(&mut self, vertices: &[GeoPoint]);

    /// Reflect the draw control state without firing a toggle event.
    fn set_draw_control(&mut self, active: bool);

    fn show_connection_status(&mut self, status: &ConnectionStatus);

    fn move_position_marker(&mut self, fix: &Fix);

    /// Fit the viewport to `area` (x = longitude, y = latitude).
    fn zoom_to(&mut self, area: &Bounds);
}

/// Square area of `half_size_m` meters either side of `center`.
pub fn area_around(center: GeoPoint, half_size_m: f64) -> Bounds {
    let half = half_size_m.abs();
    let dlat = half / METERS_PER_DEGREE;
    let cos_lat = center.latitude.to_radians().cos().abs().max(1e-6);
    let dlon = (half / (METERS_PER_DEGREE * cos_lat)).min(180.0);
    Bounds::new(
        center.longitude - dlon,
        center.latitude - dlat,
        center.longitude + dlon,
        center.latitude + dlat,
    )
}
