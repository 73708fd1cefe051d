use geo::{BoundingRect, LineString, Rect};

use super::GeofenceError;
use crate::domain::GeoPoint;
use crate::geometry::{nearest_edge_distance, point_in_polygon};

/// Answers "is this location inside the fence, or close enough to it"
///
/// The polygon is fixed at construction and never mutated, so one evaluator
/// can serve any number of queries from any number of threads.
#[derive(Debug, Clone)]
pub struct GeofenceEvaluator {
    /// Vertices as supplied, in degrees
    vertices: Vec<GeoPoint>,
    /// Same ring converted to radians once up front
    radians: Vec<GeoPoint>,
}

impl GeofenceEvaluator {
    /// Build an evaluator from an ordered, implicitly closed ring of vertices
    ///
    /// # Arguments
    /// * `vertices` - (longitude, latitude) pairs in degrees
    ///
    /// # Returns
    /// * `Err(InvalidPolygon)` - if the ring is empty or holds a NaN/Inf coordinate
    pub fn new(vertices: Vec<GeoPoint>) -> Result<Self, GeofenceError> {
        if vertices.is_empty() {
            return Err(GeofenceError::InvalidPolygon(
                "geofence has no vertices".to_string(),
            ));
        }

        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(GeofenceError::InvalidPolygon(format!(
                "vertex {} has a non-finite coordinate",
                index
            )));
        }

        let radians = vertices.iter().map(|v| v.to_radians()).collect();

        Ok(Self { vertices, radians })
    }

    /// Build from a source that may not have produced a polygon at all
    pub fn from_source(vertices: Option<Vec<GeoPoint>>) -> Result<Self, GeofenceError> {
        match vertices {
            Some(v) => Self::new(v),
            None => Err(GeofenceError::InvalidPolygon(
                "geofence data not found".to_string(),
            )),
        }
    }

    /// Check whether `point` is inside the fence or within `tolerance_m`
    /// metres of its boundary
    ///
    /// A tolerance of zero asks for strict containment. Points exactly on the
    /// boundary may go either way, but the answer for a given input is stable.
    pub fn is_within_area(
        &self,
        point: GeoPoint,
        tolerance_m: f64,
    ) -> Result<bool, GeofenceError> {
        check_point(point)?;
        if !tolerance_m.is_finite() || tolerance_m < 0.0 {
            return Err(GeofenceError::InvalidArgument(format!(
                "tolerance must be a finite, non-negative number of metres, got {}",
                tolerance_m
            )));
        }

        let p = point.to_radians();

        if point_in_polygon(p, &self.radians) {
            tracing::debug!(
                lon = point.longitude,
                lat = point.latitude,
                "point inside geofence"
            );
            return Ok(true);
        }

        if tolerance_m == 0.0 {
            tracing::debug!(
                lon = point.longitude,
                lat = point.latitude,
                "point outside geofence, no tolerance"
            );
            return Ok(false);
        }

        let distance = nearest_edge_distance(p, &self.radians);
        let within = distance <= tolerance_m;
        tracing::debug!(
            lon = point.longitude,
            lat = point.latitude,
            distance_m = distance,
            tolerance_m,
            within,
            "point outside geofence, checked tolerance"
        );

        Ok(within)
    }

    /// Raw containment test with no tolerance
    pub fn contains(&self, point: GeoPoint) -> Result<bool, GeofenceError> {
        self.is_within_area(point, 0.0)
    }

    /// Distance in metres from `point` to the nearest fence edge
    pub fn distance_to_boundary(&self, point: GeoPoint) -> Result<f64, GeofenceError> {
        check_point(point)?;
        Ok(nearest_edge_distance(point.to_radians(), &self.radians))
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false, construction rejects empty rings
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Degree-space bounding box of the fence
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let ring: LineString<f64> = self
            .vertices
            .iter()
            .map(|&v| geo::Coord::from(v))
            .collect();
        ring.bounding_rect()
    }
}

fn check_point(point: GeoPoint) -> Result<(), GeofenceError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(GeofenceError::InvalidArgument(format!(
            "coordinates must be finite, got ({}, {})",
            point.longitude, point.latitude
        )))
    }
}
