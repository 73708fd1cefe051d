pub mod error;
pub mod evaluator;

pub use error::GeofenceError;
pub use evaluator::GeofenceEvaluator;
