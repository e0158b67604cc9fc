//! Open-path 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions `1 ≤ i < j < n`, consider reversing the
//! subrange `route[i..=j]`. On an open path only two edges can change:
//!
//! ```text
//! delta = d(r[i-1], r[j]) - d(r[i-1], r[i])            (entering edge)
//!       + d(r[i], r[j+1]) - d(r[j], r[j+1])            (leaving edge, only if j < n-1)
//! ```
//!
//! There is no wraparound edge, so reversing a tail (`j = n-1`) changes just
//! the entering edge. On asymmetric matrices the reversed span's interior
//! edges change direction and their difference is added to the delta.
//!
//! The first move with `delta < -epsilon` is applied and the scan restarts
//! (first-improvement), until a full scan finds nothing or the pass cap
//! (1000 by default) is reached.
//!
//! # Complexity
//!
//! O(n²) per scan.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use log::{trace, warn};

use crate::distance::DistanceMatrix;
use crate::evaluation::route_distance;
use crate::models::Route;

use super::{
    reversal_interior_delta, Improvement, SearchLimits, Termination, DEFAULT_EPSILON,
    SYMMETRY_TOLERANCE,
};

/// Default cap on applied 2-opt moves.
pub const TWO_OPT_MAX_PASSES: usize = 1000;

/// Applies open-path 2-opt with default limits.
///
/// Returns the improved route and its open-path distance.
///
/// # Examples
///
/// ```
/// use open_route::distance::DistanceMatrix;
/// use open_route::local_search::two_opt_improve;
/// use open_route::models::Route;
///
/// // Depot and three stops on a line at x = 0, 1, 2, 3.
/// let mut dm = DistanceMatrix::new(4);
/// for i in 0..4 {
///     for j in 0..4 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
///
/// let (route, dist) = two_opt_improve(Route::new(vec![0, 3, 2, 1]).unwrap(), &dm);
/// assert_eq!(route.as_slice(), &[0, 1, 2, 3]);
/// assert!((dist - 3.0).abs() < 1e-10);
/// ```
pub fn two_opt_improve(route: Route, distances: &DistanceMatrix) -> (Route, f64) {
    let result = two_opt_improve_with(
        route,
        distances,
        &SearchLimits::new(DEFAULT_EPSILON, TWO_OPT_MAX_PASSES),
    );
    (result.route, result.distance)
}

/// Applies open-path 2-opt under explicit limits.
pub fn two_opt_improve_with(
    mut route: Route,
    distances: &DistanceMatrix,
    limits: &SearchLimits,
) -> Improvement {
    let symmetric = distances.is_symmetric(SYMMETRY_TOLERANCE);
    let mut moves = 0;

    let termination = loop {
        if route.len() < 3 {
            break Termination::Converged;
        }
        if moves >= limits.max_passes {
            break Termination::PassCap;
        }
        if limits.expired() {
            break Termination::Deadline;
        }
        match find_first_move(route.as_slice(), distances, symmetric, limits.epsilon) {
            Some((i, j)) => {
                route.as_mut_vec()[i..=j].reverse();
                moves += 1;
            }
            None => break Termination::Converged,
        }
    };

    if termination == Termination::PassCap {
        warn!("2-opt stopped at pass cap after {moves} moves");
    }
    trace!("2-opt applied {moves} moves ({termination:?})");

    let distance = route_distance(route.as_slice(), distances);
    Improvement {
        route,
        distance,
        moves,
        termination,
    }
}

fn find_first_move(
    route: &[usize],
    distances: &DistanceMatrix,
    symmetric: bool,
    epsilon: f64,
) -> Option<(usize, usize)> {
    let n = route.len();
    for i in 1..n - 1 {
        for j in i + 1..n {
            let mut delta = two_opt_delta(route, distances, i, j);
            if !symmetric {
                delta += reversal_interior_delta(route, i, j, distances);
            }
            if delta < -epsilon {
                return Some((i, j));
            }
        }
    }
    None
}

/// Boundary-edge cost change of reversing `route[i..=j]` on an open path.
///
/// Before: ... - r[i-1] - r[i] ... r[j] - r[j+1] - ...
/// After:  ... - r[i-1] - r[j] ... r[i] - r[j+1] - ...
fn two_opt_delta(route: &[usize], distances: &DistanceMatrix, i: usize, j: usize) -> f64 {
    let prev = route[i - 1];
    let mut old_cost = distances.get(prev, route[i]);
    let mut new_cost = distances.get(prev, route[j]);

    if let Some(&next) = route.get(j + 1) {
        old_cost += distances.get(route[j], next);
        new_cost += distances.get(route[i], next);
    }

    new_cost - old_cost
}
