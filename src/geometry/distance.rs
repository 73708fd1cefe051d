use crate::domain::GeoPoint;

/// Mean Earth radius in metres
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Segments shorter than this (metres) are treated as a single point
const MIN_SEGMENT_LENGTH_M: f64 = 0.01;

/// Great-circle distance between two radian coordinates
///
/// # Returns
/// * Distance in the same unit as `radius`
pub fn haversine_distance(p1: GeoPoint, p2: GeoPoint, radius: f64) -> f64 {
    let d_lat = p2.latitude - p1.latitude;
    let d_lon = p2.longitude - p1.longitude;

    let a = (d_lat / 2.0).sin().powi(2)
        + p1.latitude.cos() * p2.latitude.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// Distance in metres from a point to the segment `start -> end`
///
/// The projection parameter is a flat dot product in radian space divided by
/// the squared haversine length of the segment, clamped to the segment. The
/// units are mixed, so this is only a rough projection for short edges.
pub fn point_to_segment_distance(point: GeoPoint, start: GeoPoint, end: GeoPoint) -> f64 {
    let line_length = haversine_distance(start, end, EARTH_RADIUS_M);

    if line_length < MIN_SEGMENT_LENGTH_M {
        return haversine_distance(point, start, EARTH_RADIUS_M);
    }

    let d_lon = end.longitude - start.longitude;
    let d_lat = end.latitude - start.latitude;

    let t = ((point.longitude - start.longitude) * d_lon
        + (point.latitude - start.latitude) * d_lat)
        / (line_length * line_length);
    let t = t.clamp(0.0, 1.0);

    let nearest = GeoPoint::new(start.longitude + t * d_lon, start.latitude + t * d_lat);

    haversine_distance(point, nearest, EARTH_RADIUS_M)
}

/// Smallest point-to-edge distance over every edge of a closed ring
///
/// Edges pair each vertex with the previous one, wrapping around, the same
/// way the containment test walks the ring. Returns `f64::MAX` for an empty
/// ring.
pub fn nearest_edge_distance(point: GeoPoint, polygon: &[GeoPoint]) -> f64 {
    let mut nearest = f64::MAX;
    let count = polygon.len();
    if count == 0 {
        return nearest;
    }

    let mut j = count - 1;
    for i in 0..count {
        let distance = point_to_segment_distance(point, polygon[i], polygon[j]);
        nearest = nearest.min(distance);
        j = i;
    }

    nearest
}
