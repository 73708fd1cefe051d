use thiserror::Error;

/// Errors raised by the fence evaluator
///
/// Both variants point at a caller or configuration defect; neither is worth
/// retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeofenceError {
    #[error("invalid geofence polygon: {0}")]
    InvalidPolygon(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
