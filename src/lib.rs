//! geocheck - Check whether GPS coordinates fall inside or near a geofence

pub mod cases;
pub mod config;
pub mod domain;
pub mod geofence;
pub mod geometry;
pub mod report;
pub mod source;

pub use domain::GeoPoint;
pub use geofence::{GeofenceError, GeofenceEvaluator};
pub use report::{LocationCheck, LocationReport};
