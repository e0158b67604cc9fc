//! Nearest-neighbor constructive heuristic.
//!
//! Builds the route greedily: starting from the depot, always visit the
//! nearest unvisited stop. Ties go to the lowest index.
//!
//! # Complexity
//!
//! O(n²) where n = number of locations.
//!
//! # Reference
//!
//! The simplest constructive heuristic for TSP variants. It makes a fast
//! bootstrap for local search, but leaves the final stop to chance, which
//! matters on open paths.

use crate::distance::DistanceMatrix;
use crate::models::{Route, DEPOT};

use super::Constructor;

/// Constructs a route using the nearest-neighbor heuristic.
///
/// # Examples
///
/// ```
/// use open_route::constructive::nearest_neighbor;
/// use open_route::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 1.0],
///     vec![10.0, 0.0, 9.0],
///     vec![1.0, 9.0, 0.0],
/// ])
/// .unwrap();
///
/// // Stop 2 is nearest to the depot, then stop 1.
/// assert_eq!(nearest_neighbor(&dm).as_slice(), &[0, 2, 1]);
/// ```
pub fn nearest_neighbor(distances: &DistanceMatrix) -> Route {
    grow_nearest(distances, None)
}

/// Nearest-neighbor growth from the depot. When `reserved_end` is set, that
/// stop is skipped during growth and appended last.
pub(super) fn grow_nearest(distances: &DistanceMatrix, reserved_end: Option<usize>) -> Route {
    let n = distances.size();
    if n == 0 {
        return Route::identity(0);
    }

    let mut visited = vec![false; n];
    visited[DEPOT] = true;
    if let Some(end) = reserved_end {
        visited[end] = true;
    }

    let mut order = Vec::with_capacity(n);
    order.push(DEPOT);
    let mut current = DEPOT;
    while let Some(next) = distances.nearest_unvisited(current, &visited) {
        visited[next] = true;
        order.push(next);
        current = next;
    }

    if let Some(end) = reserved_end {
        order.push(end);
    }
    Route::from_order(order)
}

/// [`Constructor`] wrapper around [`nearest_neighbor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl Constructor for NearestNeighbor {
    fn name(&self) -> &'static str {
        "nearest-neighbor"
    }

    fn construct(&self, distances: &DistanceMatrix) -> Vec<Route> {
        vec![nearest_neighbor(distances)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_permutation, euclidean};

    #[test]
    fn test_nn_line_in_order() {
        let dm = euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(nearest_neighbor(&dm).as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_nn_chooses_nearest() {
        let dm = euclidean(&[(0.0, 0.0), (10.0, 0.0), (1.0, 0.0)]);
        assert_eq!(nearest_neighbor(&dm).as_slice(), &[0, 2, 1]);
    }

    #[test]
    fn test_nn_tie_goes_to_lowest_index() {
        // Stops 1 and 2 are equidistant from the depot.
        let dm = euclidean(&[(0.0, 0.0), (0.0, 1.0), (0.0, -1.0), (5.0, 0.0)]);
        assert_eq!(nearest_neighbor(&dm).as_slice()[1], 1);
    }

    #[test]
    fn test_nn_depot_only() {
        let dm = DistanceMatrix::new(1);
        assert_eq!(nearest_neighbor(&dm).as_slice(), &[0]);
    }

    #[test]
    fn test_grow_nearest_reserved_end() {
        let dm = euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        let route = grow_nearest(&dm, Some(2));
        assert_eq!(route.as_slice(), &[0, 1, 3, 4, 2]);
        assert_permutation(&route, 5);
    }

    #[test]
    fn test_constructor_wrapper() {
        let dm = euclidean(&[(0.0, 0.0), (1.0, 0.0)]);
        let routes = NearestNeighbor.construct(&dm);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].as_slice(), &[0, 1]);
    }
}
