//! Cheapest-insertion constructive heuristic.
//!
//! # Algorithm
//!
//! Seeds the route with the depot and the stop nearest to it, then
//! repeatedly inserts the (stop, position) pair with the globally smallest
//! marginal cost:
//!
//! ```text
//! between a and b:  d(a, c) + d(c, b) - d(a, b)
//! appended after z: d(z, c)
//! ```
//!
//! No position before the depot is considered. Ties go to the stop with the
//! lowest index, then to the earliest position.
//!
//! # Complexity
//!
//! O(n³) where n = number of locations.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An Analysis of
//! Several Heuristics for the Traveling Salesman Problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use crate::distance::DistanceMatrix;
use crate::models::{Route, DEPOT};

use super::Constructor;

/// Constructs a route by repeated cheapest insertion.
///
/// # Examples
///
/// ```
/// use open_route::constructive::cheapest_insertion;
/// use open_route::distance::DistanceMatrix;
///
/// let mut dm = DistanceMatrix::new(4);
/// for i in 0..4 {
///     for j in 0..4 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
///
/// assert_eq!(cheapest_insertion(&dm).as_slice(), &[0, 1, 2, 3]);
/// ```
pub fn cheapest_insertion(distances: &DistanceMatrix) -> Route {
    let n = distances.size();
    if n <= 2 {
        return Route::identity(n);
    }

    let mut placed = vec![false; n];
    placed[DEPOT] = true;
    let mut order = Vec::with_capacity(n);
    order.push(DEPOT);
    if let Some(first) = distances.nearest_unvisited(DEPOT, &placed) {
        placed[first] = true;
        order.push(first);
    }

    while order.len() < n {
        let Some((stop, pos)) = cheapest_placement(&order, &placed, distances) else {
            break;
        };
        placed[stop] = true;
        order.insert(pos, stop);
    }

    Route::from_order(order)
}

/// Finds the unplaced stop and position with the smallest insertion cost.
fn cheapest_placement(
    order: &[usize],
    placed: &[bool],
    distances: &DistanceMatrix,
) -> Option<(usize, usize)> {
    let mut best: Option<(f64, usize, usize)> = None;
    for stop in (0..placed.len()).filter(|&s| !placed[s]) {
        for pos in 1..=order.len() {
            let cost = insertion_cost(order, distances, stop, pos);
            if best.map_or(true, |(best_cost, _, _)| cost < best_cost) {
                best = Some((cost, stop, pos));
            }
        }
    }
    best.map(|(_, stop, pos)| (stop, pos))
}

/// Marginal cost of inserting `stop` before `order[pos]`, or appending it
/// when `pos == order.len()`.
fn insertion_cost(order: &[usize], distances: &DistanceMatrix, stop: usize, pos: usize) -> f64 {
    let before = order[pos - 1];
    match order.get(pos) {
        Some(&after) => {
            distances.get(before, stop) + distances.get(stop, after) - distances.get(before, after)
        }
        None => distances.get(before, stop),
    }
}

/// [`Constructor`] wrapper around [`cheapest_insertion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestInsertion;

impl Constructor for CheapestInsertion {
    fn name(&self) -> &'static str {
        "cheapest-insertion"
    }

    fn construct(&self, distances: &DistanceMatrix) -> Vec<Route> {
        vec![cheapest_insertion(distances)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_permutation, euclidean};

    #[test]
    fn test_insertion_cost_cases() {
        let dm = euclidean(&[(0.0, 0.0), (2.0, 0.0), (1.0, 1.0)]);
        let order = [0, 1];
        // Between 0 and 1: √2 + √2 - 2.
        let between = insertion_cost(&order, &dm, 2, 1);
        assert!((between - (2.0 * 2f64.sqrt() - 2.0)).abs() < 1e-10);
        // Appended after 1: √2.
        assert!((insertion_cost(&order, &dm, 2, 2) - 2f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_seed_is_nearest_stop() {
        let dm = euclidean(&[(0.0, 0.0), (5.0, 0.0), (1.0, 0.0), (9.0, 0.0)]);
        let route = cheapest_insertion(&dm);
        assert_eq!(route.as_slice(), &[0, 2, 1, 3]);
    }

    #[test]
    fn test_inserts_in_the_middle() {
        // 1 → 2 is expensive but 0 → 2 → 1 barely costs more than 0 → 1.
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 1.2],
            vec![1.0, 0.0, 10.0],
            vec![1.2, 0.5, 0.0],
        ])
        .expect("square");
        assert_eq!(cheapest_insertion(&dm).as_slice(), &[0, 2, 1]);
    }

    #[test]
    fn test_tiny_instances() {
        assert_eq!(cheapest_insertion(&DistanceMatrix::new(1)).as_slice(), &[0]);
        let dm = euclidean(&[(0.0, 0.0), (3.0, 4.0)]);
        assert_eq!(cheapest_insertion(&dm).as_slice(), &[0, 1]);
    }

    #[test]
    fn test_scattered_points_are_permutation() {
        let dm = euclidean(&[
            (0.0, 0.0),
            (4.0, 1.0),
            (-2.0, 3.0),
            (1.0, -5.0),
            (6.0, 6.0),
            (-3.0, -1.0),
        ]);
        let routes = CheapestInsertion.construct(&dm);
        assert_eq!(routes.len(), 1);
        assert_permutation(&routes[0], 6);
    }
}
