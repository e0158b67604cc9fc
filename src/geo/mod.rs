//! Geographic primitives used by the cost-matrix collaborators.
//!
//! - [`GeoPoint`] and [`haversine_km`] — great-circle distance estimate
//! - [`decode_polyline`] — encoded-polyline geometry from a road router

mod point;
mod polyline;

pub use point::{haversine_km, GeoPoint, EARTH_RADIUS_KM};
pub use polyline::decode_polyline;
