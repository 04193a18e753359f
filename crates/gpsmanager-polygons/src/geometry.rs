//! Planar geometry on polygon vertices.
//!
//! Coordinates are treated as a flat plane with `x = longitude` and
//! `y = latitude`, which is adequate at the scale polygons are drawn.

use gpsmanager_core::GeoPoint;

/// Points closer than this to an edge count as lying on it.
pub const BOUNDARY_EPSILON: f64 = 1e-12;

/// Even-odd ray casting test for strict interior membership.
pub fn contains_point(vertices: &[GeoPoint], p: GeoPoint) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let (px, py) = (p.x(), p.y());
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].x(), vertices[i].y());
        let (xj, yj) = (vertices[j].x(), vertices[j].y());
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Distance from `p` to the segment `a`–`b`.
pub fn distance_to_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let (dx, dy) = (b.x() - a.x(), b.y() - a.y());
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x() - a.x()) * dx + (p.y() - a.y()) * dy) / len_sq).clamp(0.0, 1.0);
    let projected = GeoPoint::new(a.y() + t * dy, a.x() + t * dx);
    p.distance_to(&projected)
}

/// Distance from `p` to the closed outline of the polygon.
pub fn distance_to_boundary(vertices: &[GeoPoint], p: GeoPoint) -> f64 {
    match vertices.len() {
        0 => f64::INFINITY,
        1 => p.distance_to(&vertices[0]),
        n => (0..n)
            .map(|i| distance_to_segment(p, vertices[i], vertices[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Distance from `p` to the polygon area.
///
/// Zero for points inside or on the boundary, positive outside. Hit tests
/// accept a polygon when this is `<= 0`.
pub fn distance(vertices: &[GeoPoint], p: GeoPoint) -> f64 {
    if contains_point(vertices, p) {
        return 0.0;
    }
    let d = distance_to_boundary(vertices, p);
    if d <= BOUNDARY_EPSILON {
        0.0
    } else {
        d
    }
}

/// Index of the vertex nearest to `p` within `tolerance`.
pub fn nearest_vertex(vertices: &[GeoPoint], p: GeoPoint, tolerance: f64) -> Option<usize> {
    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| (i, v.distance_to(&p)))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
