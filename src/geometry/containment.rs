use crate::domain::GeoPoint;

/// Even-odd ray casting test
///
/// Treats longitude as x and latitude as y, so edges are straight lines in
/// coordinate space rather than great circles. Works on any simple polygon
/// regardless of winding order. Points exactly on an edge may land on either
/// side depending on floating point rounding.
///
/// # Arguments
/// * `point` - Query point in radians
/// * `polygon` - Implicitly closed ring of vertices in radians
pub fn point_in_polygon(point: GeoPoint, polygon: &[GeoPoint]) -> bool {
    let mut inside = false;
    let count = polygon.len();
    if count == 0 {
        return inside;
    }

    let mut j = count - 1;
    for i in 0..count {
        let vi = polygon[i];
        let vj = polygon[j];

        // Horizontal edges fail the straddle check, so the divisor is never zero
        if (vi.latitude > point.latitude) != (vj.latitude > point.latitude)
            && point.longitude
                < (vj.longitude - vi.longitude) * (point.latitude - vi.latitude)
                    / (vj.latitude - vi.latitude)
                    + vi.longitude
        {
            inside = !inside;
        }

        j = i;
    }

    inside
}
