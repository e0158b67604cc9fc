//! Delivery stops.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A delivery stop supplied by the caller.
///
/// The identifier is opaque to the solver; a stop's matrix index is its
/// position in the caller's list plus one (index 0 is the depot).
///
/// # Examples
///
/// ```
/// use open_route::models::Stop;
///
/// let stop = Stop::new("ORD001", 34.7421, 10.7548);
/// assert_eq!(stop.id, "ORD001");
/// assert_eq!(stop.location.lon, 10.7548);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Caller-defined identifier (e.g. an order number).
    pub id: String,
    /// Where the delivery happens.
    pub location: GeoPoint,
}

impl Stop {
    /// Creates a stop at the given coordinate.
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            location: GeoPoint::new(lat, lon),
        }
    }
}
