//! Matrix fixtures and proptest strategies shared by operator tests.

use proptest::prelude::*;

use crate::distance::DistanceMatrix;
use crate::evaluation::route_distance;
use crate::models::Route;

/// Euclidean matrix over the given points (index 0 = depot).
pub fn euclidean(points: &[(f64, f64)]) -> DistanceMatrix {
    let n = points.len();
    let mut dm = DistanceMatrix::new(n);
    for i in 0..n {
        for j in 0..n {
            let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
            dm.set(i, j, (dx * dx + dy * dy).sqrt());
        }
    }
    dm
}

/// Cheapest open path by exhaustive enumeration (small n only).
pub fn brute_force(dm: &DistanceMatrix) -> f64 {
    fn walk(dm: &DistanceMatrix, path: &mut Vec<usize>, used: &mut [bool], best: &mut f64) {
        if path.len() == used.len() {
            *best = best.min(route_distance(path, dm));
            return;
        }
        for next in 1..used.len() {
            if !used[next] {
                used[next] = true;
                path.push(next);
                walk(dm, path, used, best);
                path.pop();
                used[next] = false;
            }
        }
    }
    let n = dm.size();
    let mut used = vec![false; n];
    used[0] = true;
    let mut best = f64::INFINITY;
    walk(dm, &mut vec![0], &mut used, &mut best);
    best
}

/// Asserts `route` is a depot-first permutation of `0..n`.
pub fn assert_permutation(route: &Route, n: usize) {
    assert_eq!(route.len(), n);
    assert_eq!(route.as_slice()[0], 0);
    let mut sorted = route.as_slice().to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..n).collect::<Vec<_>>());
}

/// Random matrix, symmetric or not, with entries in `[0, 100)`.
pub fn arb_matrix(max_n: usize) -> impl Strategy<Value = DistanceMatrix> {
    (1..=max_n, any::<bool>()).prop_flat_map(|(n, symmetric)| {
        proptest::collection::vec(0.0f64..100.0, n * n).prop_map(move |mut data| {
            for i in 0..n {
                data[i * n + i] = 0.0;
                if symmetric {
                    for j in 0..i {
                        data[i * n + j] = data[j * n + i];
                    }
                }
            }
            DistanceMatrix::from_data(n, data).expect("square")
        })
    })
}

/// A random matrix paired with a random valid route over it.
pub fn arb_instance(max_n: usize) -> impl Strategy<Value = (DistanceMatrix, Route)> {
    arb_matrix(max_n).prop_flat_map(|dm| {
        let n = dm.size();
        let stops: Vec<usize> = (1..n).collect();
        (Just(dm), Just(stops).prop_shuffle()).prop_map(|(dm, stops)| {
            let mut order = vec![0];
            order.extend(stops);
            (dm, Route::new(order).expect("permutation"))
        })
    })
}
