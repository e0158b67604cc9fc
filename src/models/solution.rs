//! Solution record.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Route;

/// A route together with its open-path totals.
///
/// Records are compared by total distance only; duration is reported
/// alongside but never optimized.
///
/// # Examples
///
/// ```
/// use open_route::models::{Route, SolutionRecord};
///
/// let a = SolutionRecord::new(Route::identity(3), 10.0, 20.0);
/// let b = SolutionRecord::new(Route::new(vec![0, 2, 1]).unwrap(), 12.0, 15.0);
/// assert!(a.is_better_than(&b));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    /// Depot-first visiting order.
    pub route: Route,
    /// Sum of consecutive distance-matrix entries along the route.
    pub total_distance: f64,
    /// Sum of consecutive duration-matrix entries along the route.
    pub total_duration: f64,
}

impl SolutionRecord {
    /// Creates a record.
    pub fn new(route: Route, total_distance: f64, total_duration: f64) -> Self {
        Self {
            route,
            total_distance,
            total_duration,
        }
    }

    /// Orders records by distance, breaking exact ties by the route sequence
    /// so that picking a minimum does not depend on evaluation order.
    pub fn cmp_by_cost(&self, other: &Self) -> Ordering {
        self.total_distance
            .total_cmp(&other.total_distance)
            .then_with(|| self.route.cmp(&other.route))
    }

    /// Returns `true` if this record should replace `other` as the best.
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.cmp_by_cost(other) == Ordering::Less
    }
}
