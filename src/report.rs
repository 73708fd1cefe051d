use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::GeoPoint;
use crate::geofence::{GeofenceError, GeofenceEvaluator};

pub const WITHIN_MESSAGE: &str = "Location is within geofence";
pub const OUTSIDE_MESSAGE: &str = "Location is outside geofence";

/// Reason a location check request was turned away before evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("accuracy must not be negative, got {0}")]
    NegativeAccuracy(f64),
}

/// A location check request: where the device is and how sure it is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationCheck {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// Accuracy radius in metres
    #[serde(default)]
    pub accuracy: f64,
}

impl LocationCheck {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("accuracy", self.accuracy),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field });
            }
        }
        if self.accuracy < 0.0 {
            return Err(ValidationError::NegativeAccuracy(self.accuracy));
        }
        Ok(())
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// Validate the request and evaluate it against `fence`
    pub fn run(&self, fence: &GeofenceEvaluator) -> anyhow::Result<LocationReport> {
        self.validate()?;
        Ok(self.evaluate(fence)?)
    }

    /// Like [`run`](Self::run) but skips request validation
    pub fn evaluate(&self, fence: &GeofenceEvaluator) -> Result<LocationReport, GeofenceError> {
        fence
            .is_within_area(self.point(), self.accuracy)
            .map(LocationReport::new)
    }
}

/// Response body for a location check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationReport {
    pub result: bool,
    pub message: String,
}

impl LocationReport {
    pub fn new(result: bool) -> Self {
        let message = if result {
            WITHIN_MESSAGE
        } else {
            OUTSIDE_MESSAGE
        };
        Self {
            result,
            message: message.to_string(),
        }
    }
}
