pub mod containment;
pub mod distance;

pub use containment::point_in_polygon;
pub use distance::{
    EARTH_RADIUS_M, haversine_distance, nearest_edge_distance, point_to_segment_distance,
};
