//! Open-path Or-opt improvement.
//!
//! # Algorithm
//!
//! Tries moving segments of 1, 2, or 3 consecutive stops to a different
//! position in the same route. The depot at position 0 is never part of a
//! segment, and a segment may be reinserted directly after the depot or
//! appended after the last stop.
//!
//! For a segment `s = r[from..from+len]` between `p = r[from-1]` and the
//! optional `a = r[from+len]`, reinserted between `x` and the optional `y`:
//!
//! ```text
//! removal   = d(p, s0) + d(s_last, a) - d(p, a)        (a-terms only if a exists)
//! insertion = d(x, s0) + d(s_last, y) - d(x, y)        (y-terms only if y exists)
//! delta     = insertion - removal
//! ```
//!
//! Segments keep their orientation, so the delta is exact on asymmetric
//! matrices too. Each pass tries segment lengths in ascending order, applies
//! the first move with `delta < -epsilon`, and restarts; the search stops at
//! a fixed point or after 500 moves by default.
//!
//! # Complexity
//!
//! O(n²) per scan.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use log::{trace, warn};

use crate::distance::DistanceMatrix;
use crate::evaluation::route_distance;
use crate::models::Route;

use super::{Improvement, SearchLimits, Termination, DEFAULT_EPSILON};

/// Default cap on applied Or-opt moves.
pub const OR_OPT_MAX_PASSES: usize = 500;

/// Longest segment relocated by default.
pub const OR_OPT_MAX_SEGMENT: usize = 3;

/// A segment relocation: move `route[from..from+len]` so that it sits
/// before original position `to` (or at the end when `to == n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Relocation {
    from: usize,
    len: usize,
    to: usize,
}

/// Applies Or-opt with default limits and segment lengths 1–3.
///
/// Returns the improved route and its open-path distance.
///
/// # Examples
///
/// ```
/// use open_route::distance::DistanceMatrix;
/// use open_route::local_search::or_opt_improve;
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
/// // Stop 3 visited first: relocating it to the end fixes the route.
/// let (route, dist) = or_opt_improve(Route::new(vec![0, 3, 1, 2]).unwrap(), &dm);
/// assert_eq!(route.as_slice(), &[0, 1, 2, 3]);
/// assert!((dist - 3.0).abs() < 1e-10);
/// ```
pub fn or_opt_improve(route: Route, distances: &DistanceMatrix) -> (Route, f64) {
    let result = or_opt_improve_with(
        route,
        distances,
        &SearchLimits::new(DEFAULT_EPSILON, OR_OPT_MAX_PASSES),
        OR_OPT_MAX_SEGMENT,
    );
    (result.route, result.distance)
}

/// Applies Or-opt under explicit limits, relocating segments of length
/// `1..=max_segment`.
pub fn or_opt_improve_with(
    mut route: Route,
    distances: &DistanceMatrix,
    limits: &SearchLimits,
    max_segment: usize,
) -> Improvement {
    let mut moves = 0;

    let termination = loop {
        if moves >= limits.max_passes {
            break Termination::PassCap;
        }
        if limits.expired() {
            break Termination::Deadline;
        }
        let found = (1..=max_segment).find_map(|len| {
            find_first_relocation(route.as_slice(), distances, len, limits.epsilon)
        });
        match found {
            Some(mv) => {
                apply_relocation(route.as_mut_vec(), mv);
                moves += 1;
            }
            None => break Termination::Converged,
        }
    };

    if termination == Termination::PassCap {
        warn!("or-opt stopped at pass cap after {moves} moves");
    }
    trace!("or-opt applied {moves} moves ({termination:?})");

    let distance = route_distance(route.as_slice(), distances);
    Improvement {
        route,
        distance,
        moves,
        termination,
    }
}

fn find_first_relocation(
    route: &[usize],
    distances: &DistanceMatrix,
    len: usize,
    epsilon: f64,
) -> Option<Relocation> {
    let n = route.len();
    // Need at least one stop outside the segment.
    if n < len + 2 {
        return None;
    }

    // Tail segments may move, and `to == n` appends after the last stop.
    for from in 1..=n - len {
        let removal = removal_gain(route, distances, from, len);
        for to in 1..=n {
            if (from..=from + len).contains(&to) {
                continue;
            }
            let delta = insertion_cost(route, distances, from, len, to) - removal;
            if delta < -epsilon {
                return Some(Relocation { from, len, to });
            }
        }
    }
    None
}

/// Cost saved by cutting `route[from..from+len]` out and bridging its
/// neighbours.
fn removal_gain(route: &[usize], distances: &DistanceMatrix, from: usize, len: usize) -> f64 {
    let prev = route[from - 1];
    let first = route[from];
    let last = route[from + len - 1];

    let mut gain = distances.get(prev, first);
    if let Some(&after) = route.get(from + len) {
        gain += distances.get(last, after) - distances.get(prev, after);
    }
    gain
}

/// Cost of placing the segment between `route[to-1]` and `route[to]`.
fn insertion_cost(
    route: &[usize],
    distances: &DistanceMatrix,
    from: usize,
    len: usize,
    to: usize,
) -> f64 {
    let first = route[from];
    let last = route[from + len - 1];
    let before = route[to - 1];

    let mut cost = distances.get(before, first);
    if let Some(&next) = route.get(to) {
        cost += distances.get(last, next) - distances.get(before, next);
    }
    cost
}

fn apply_relocation(route: &mut Vec<usize>, mv: Relocation) {
    let segment: Vec<usize> = route.drain(mv.from..mv.from + mv.len).collect();
    let insert_pos = if mv.to > mv.from { mv.to - mv.len } else { mv.to };
    route.splice(insert_pos..insert_pos, segment);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_support::{arb_instance, assert_permutation, euclidean};

    fn line() -> DistanceMatrix {
        euclidean(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (5.0, 0.0),
        ])
    }

    #[test]
    fn test_or_opt_already_optimal() {
        let (route, dist) = or_opt_improve(Route::identity(6), &line());
        assert_eq!(route.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert!((dist - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_or_opt_moves_segment_back() {
        // Segment [4, 5] visited too early.
        let initial = Route::new(vec![0, 1, 4, 5, 2, 3]).expect("valid");
        let (route, dist) = or_opt_improve(initial, &line());
        assert_eq!(route.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert!((dist - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_or_opt_moves_segment_forward_after_depot() {
        let initial = Route::new(vec![0, 3, 4, 5, 1, 2]).expect("valid");
        let (route, dist) = or_opt_improve(initial, &line());
        assert!((dist - 5.0).abs() < 1e-10);
        assert_permutation(&route, 6);
    }

    #[test]
    fn test_or_opt_relocates_tail_segment() {
        // Stop 1 is visited last; only moving the tail fixes it.
        let dm = euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let initial = Route::new(vec![0, 2, 3, 1]).expect("valid");
        let (route, dist) = or_opt_improve(initial, &dm);
        assert_eq!(route.as_slice(), &[0, 1, 2, 3]);
        assert!((dist - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_or_opt_appends_after_last_stop() {
        let dm = euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let initial = Route::new(vec![0, 3, 1, 2]).expect("valid");
        let (route, dist) = or_opt_improve(initial, &dm);
        assert_eq!(route.as_slice(), &[0, 1, 2, 3]);
        assert!((dist - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_apply_relocation_forward_and_backward() {
        let mut r = vec![0, 1, 2, 3, 4, 5];
        apply_relocation(&mut r, Relocation { from: 1, len: 2, to: 5 });
        assert_eq!(r, vec![0, 3, 4, 1, 2, 5]);

        let mut r = vec![0, 1, 2, 3, 4, 5];
        apply_relocation(&mut r, Relocation { from: 4, len: 2, to: 1 });
        assert_eq!(r, vec![0, 4, 5, 1, 2, 3]);

        let mut r = vec![0, 1, 2, 3];
        apply_relocation(&mut r, Relocation { from: 1, len: 1, to: 4 });
        assert_eq!(r, vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_or_opt_deltas_match_recomputed_cost() {
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
        for len in 1..=3 {
            for from in 1..=route.len() - len {
                for to in 1..=route.len() {
                    if (from..=from + len).contains(&to) {
                        continue;
                    }
                    let predicted = insertion_cost(&route, &dm, from, len, to)
                        - removal_gain(&route, &dm, from, len);
                    let mut moved = route.clone();
                    apply_relocation(&mut moved, Relocation { from, len, to });
                    let actual = route_distance(&moved, &dm) - base;
                    assert!(
                        (predicted - actual).abs() < 1e-9,
                        "len {len} from {from} to {to}: {predicted} vs {actual}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_or_opt_tiny_routes() {
        let dm = line();
        let (r, d) = or_opt_improve(Route::identity(1), &dm);
        assert_eq!(r.as_slice(), &[0]);
        assert_eq!(d, 0.0);

        let sub = euclidean(&[(0.0, 0.0), (1.0, 0.0)]);
        let (r, _) = or_opt_improve(Route::identity(2), &sub);
        assert_eq!(r.as_slice(), &[0, 1]);
    }

    proptest! {
        #[test]
        fn prop_or_opt_never_worsens((dm, route) in arb_instance(9)) {
            let n = dm.size();
            let before = route_distance(route.as_slice(), &dm);
            let (improved, after) = or_opt_improve(route, &dm);
            assert_permutation(&improved, n);
            prop_assert!(after <= before + 1e-9);
        }

        #[test]
        fn prop_or_opt_fixed_point((dm, route) in arb_instance(9)) {
            let (once, d1) = or_opt_improve(route, &dm);
            let (twice, d2) = or_opt_improve(once.clone(), &dm);
            prop_assert_eq!(once, twice);
            prop_assert!((d1 - d2).abs() < 1e-9);
        }
    }
}
