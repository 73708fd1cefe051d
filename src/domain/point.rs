use serde::{Deserialize, Serialize};

/// A (longitude, latitude) coordinate pair
///
/// Holds degrees at the API boundary and radians inside the geometry
/// routines; the type itself does not track which.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    #[serde(alias = "lat")]
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Convert a degree coordinate to radians
    pub fn to_radians(self) -> Self {
        Self {
            longitude: self.longitude.to_radians(),
            latitude: self.latitude.to_radians(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

impl From<GeoPoint> for geo::Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::coord! { x: point.longitude, y: point.latitude }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}
