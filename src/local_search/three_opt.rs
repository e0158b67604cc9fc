//! Bounded open-path 3-opt improvement.
//!
//! # Algorithm
//!
//! Cuts the route at three positions `1 ≤ i < j < k ≤ n` and evaluates two
//! reconnections:
//!
//! 1. reverse `route[i..j]`, reconnecting `r[i-1] → r[j-1]` and `r[i] → r[j]`;
//! 2. reverse `route[j..k]`, reconnecting `r[j-1] → r[k-1]` and, when
//!    `k < n`, `r[j] → r[k]`. With `k == n` the span is the tail and no
//!    trailing edge exists.
//!
//! The better of the two is applied if it lowers the cost by more than
//! `epsilon`, and the scan restarts. Segment swaps without reversal are not
//! part of the move set. Runs are capped at 100 moves by default and may
//! carry a wall-clock deadline; the solver only calls this on small
//! instances.
//!
//! # Complexity
//!
//! O(n³) per scan.
//!
//! # Reference
//!
//! Lin, S. (1965). "Computer Solutions of the Traveling Salesman Problem",
//! *Bell System Technical Journal* 44(10), 2245-2269.

use log::{trace, warn};

use crate::distance::DistanceMatrix;
use crate::evaluation::route_distance;
use crate::models::Route;

use super::{
    reversal_interior_delta, Improvement, SearchLimits, Termination, DEFAULT_EPSILON,
    SYMMETRY_TOLERANCE,
};

/// Default cap on applied 3-opt moves.
pub const THREE_OPT_MAX_PASSES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reconnection {
    /// Reverse `route[i..j]`.
    ReverseFirst,
    /// Reverse `route[j..k]`.
    ReverseSecond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ThreeOptMove {
    i: usize,
    j: usize,
    k: usize,
    kind: Reconnection,
}

enum Scan {
    Found(ThreeOptMove),
    Exhausted,
    Interrupted,
}

/// Applies bounded 3-opt with default limits and no deadline.
///
/// Returns the improved route and its open-path distance.
///
/// # Examples
///
/// ```
/// use open_route::distance::DistanceMatrix;
/// use open_route::evaluation::route_distance;
/// use open_route::local_search::three_opt_improve;
/// use open_route::models::Route;
///
/// let mut dm = DistanceMatrix::new(5);
/// for i in 0..5 {
///     for j in 0..5 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
///
/// let initial = Route::new(vec![0, 2, 1, 4, 3]).unwrap();
/// let before = route_distance(initial.as_slice(), &dm);
/// let (route, dist) = three_opt_improve(initial, &dm);
/// assert!(dist < before);
/// assert_eq!(route.as_slice(), &[0, 1, 2, 3, 4]);
/// ```
pub fn three_opt_improve(route: Route, distances: &DistanceMatrix) -> (Route, f64) {
    let result = three_opt_improve_with(
        route,
        distances,
        &SearchLimits::new(DEFAULT_EPSILON, THREE_OPT_MAX_PASSES),
    );
    (result.route, result.distance)
}

/// Applies bounded 3-opt under explicit limits.
///
/// The deadline is checked between moves and inside each scan, so a run
/// that times out still returns a valid, never-worse route.
pub fn three_opt_improve_with(
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
        match scan(route.as_slice(), distances, symmetric, limits) {
            Scan::Found(mv) => {
                apply_move(route.as_mut_vec(), mv);
                moves += 1;
            }
            Scan::Exhausted => break Termination::Converged,
            Scan::Interrupted => break Termination::Deadline,
        }
    };

    match termination {
        Termination::PassCap => warn!("3-opt stopped at pass cap after {moves} moves"),
        Termination::Deadline => warn!("3-opt stopped on time budget after {moves} moves"),
        Termination::Converged => {}
    }
    trace!("3-opt applied {moves} moves ({termination:?})");

    let distance = route_distance(route.as_slice(), distances);
    Improvement {
        route,
        distance,
        moves,
        termination,
    }
}

fn scan(
    route: &[usize],
    distances: &DistanceMatrix,
    symmetric: bool,
    limits: &SearchLimits,
) -> Scan {
    let n = route.len();
    for i in 1..n - 1 {
        if limits.expired() {
            return Scan::Interrupted;
        }
        for j in (i + 1)..n {
            for k in (j + 1)..=n {
                let found =
                    best_reconnection(route, distances, symmetric, i, j, k, limits.epsilon);
                if let Some(kind) = found {
                    return Scan::Found(ThreeOptMove { i, j, k, kind });
                }
            }
        }
    }
    Scan::Exhausted
}

/// Returns the better improving reconnection for cuts `(i, j, k)`, if any.
fn best_reconnection(
    route: &[usize],
    distances: &DistanceMatrix,
    symmetric: bool,
    i: usize,
    j: usize,
    k: usize,
    epsilon: f64,
) -> Option<Reconnection> {
    let a = route[i - 1];
    let b = route[i];
    let c = route[j - 1];
    let d = route[j];
    let e = route[k - 1];
    let f = route.get(k).copied();

    // Reverse [i..j]: a-b ... c-d  becomes  a-c ... b-d.
    let mut first = distances.get(a, c) + distances.get(b, d)
        - distances.get(a, b)
        - distances.get(c, d);

    // Reverse [j..k]: c-d ... e-f  becomes  c-e ... d-f.
    let mut second = distances.get(c, e) - distances.get(c, d);
    if let Some(f) = f {
        second += distances.get(d, f) - distances.get(e, f);
    }

    if !symmetric {
        first += reversal_interior_delta(route, i, j - 1, distances);
        second += reversal_interior_delta(route, j, k - 1, distances);
    }

    let mut best: Option<(f64, Reconnection)> = None;
    for (delta, kind) in [
        (first, Reconnection::ReverseFirst),
        (second, Reconnection::ReverseSecond),
    ] {
        if delta < -epsilon && best.map_or(true, |(b, _)| delta < b) {
            best = Some((delta, kind));
        }
    }
    best.map(|(_, kind)| kind)
}

fn apply_move(route: &mut [usize], mv: ThreeOptMove) {
    match mv.kind {
        Reconnection::ReverseFirst => route[mv.i..mv.j].reverse(),
        Reconnection::ReverseSecond => route[mv.j..mv.k].reverse(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use proptest::prelude::*;

    use super::*;
    use crate::test_support::{arb_instance, assert_permutation, euclidean};

    fn line(n: usize) -> DistanceMatrix {
        let points: Vec<(f64, f64)> = (0..n).map(|x| (x as f64, 0.0)).collect();
        euclidean(&points)
    }

    #[test]
    fn test_3opt_already_optimal() {
        let (route, dist) = three_opt_improve(Route::identity(5), &line(5));
        assert_eq!(route, Route::identity(5));
        assert!((dist - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_3opt_reverses_tail_span() {
        // Only the tail [3, 2] is out of order; k == n covers it.
        let initial = Route::new(vec![0, 1, 3, 2]).expect("valid");
        let (route, dist) = three_opt_improve(initial, &line(4));
        assert_eq!(route.as_slice(), &[0, 1, 2, 3]);
        assert!((dist - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_3opt_deltas_match_recomputed_cost() {
        let dm = euclidean(&[
            (0.0, 0.0),
            (2.0, 1.0),
            (5.0, 3.0),
            (1.0, 4.0),
            (3.0, 0.5),
            (6.0, 6.0),
        ]);
        let route = vec![0, 3, 1, 5, 2, 4];
        let base = route_distance(&route, &dm);
        let n = route.len();
        for i in 1..n - 1 {
            for j in (i + 1)..n {
                for k in (j + 1)..=n {
                    let a = route[i - 1];
                    let (b, c, d, e) = (route[i], route[j - 1], route[j], route[k - 1]);
                    let first = dm.get(a, c) + dm.get(b, d) - dm.get(a, b) - dm.get(c, d);
                    let mut moved = route.clone();
                    moved[i..j].reverse();
                    assert!((route_distance(&moved, &dm) - base - first).abs() < 1e-9);

                    let mut second = dm.get(c, e) - dm.get(c, d);
                    if k < n {
                        second += dm.get(d, route[k]) - dm.get(e, route[k]);
                    }
                    let mut moved = route.clone();
                    moved[j..k].reverse();
                    assert!((route_distance(&moved, &dm) - base - second).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_3opt_expired_deadline_returns_input() {
        let initial = Route::new(vec![0, 4, 2, 3, 1]).expect("valid");
        let limits = SearchLimits::new(DEFAULT_EPSILON, THREE_OPT_MAX_PASSES)
            .with_deadline(Instant::now());
        let result = three_opt_improve_with(initial.clone(), &line(5), &limits);
        assert_eq!(result.termination, Termination::Deadline);
        assert_eq!(result.route, initial);
        assert_eq!(result.moves, 0);
    }

    #[test]
    fn test_3opt_tiny_routes() {
        let (r, d) = three_opt_improve(Route::identity(1), &line(1));
        assert_eq!(r.as_slice(), &[0]);
        assert_eq!(d, 0.0);
        let (r, _) = three_opt_improve(Route::identity(2), &line(2));
        assert_eq!(r.as_slice(), &[0, 1]);
    }

    proptest! {
        #[test]
        fn prop_3opt_never_worsens((dm, route) in arb_instance(8)) {
            let n = dm.size();
            let before = route_distance(route.as_slice(), &dm);
            let (improved, after) = three_opt_improve(route, &dm);
            assert_permutation(&improved, n);
            prop_assert!(after <= before + 1e-9);
        }
    }
}
