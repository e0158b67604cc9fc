//! Best-end-candidate constructive heuristic.
//!
//! On an open path the final stop carries no return penalty, so the choice
//! of where to finish matters. Each stop `i` is scored as
//!
//! ```text
//! score(i) = d(depot, i) - 0.5 * mean(d(i, j) for stops j != i)
//! ```
//!
//! which favors stops far from the depot but central to the others (good
//! dead ends). For each of the top-k scored stops, a route is grown by
//! nearest neighbor over the remaining stops and that stop is appended last.
//!
//! # Complexity
//!
//! O(n²) scoring plus O(k·n²) growth, with k ≤ 15 by default.

use crate::distance::DistanceMatrix;
use crate::models::{Route, DEPOT};

use super::nearest_neighbor::grow_nearest;
use super::Constructor;

/// Default number of end candidates explored.
pub const DEFAULT_END_CANDIDATES: usize = 15;

/// Weight of the mean stop-to-stop distance in the end score.
const CENTRALITY_WEIGHT: f64 = 0.5;

/// Scores `stop` as a final destination. Higher is better.
///
/// # Examples
///
/// ```
/// use open_route::constructive::end_candidate_score;
/// use open_route::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 8.0, 9.0],
///     vec![5.0, 0.0, 4.0, 6.0],
///     vec![8.0, 4.0, 0.0, 3.0],
///     vec![9.0, 6.0, 3.0, 0.0],
/// ])
/// .unwrap();
///
/// // Stop 2: 8 - 0.5 * (4 + 3) / 2 = 6.25
/// assert!((end_candidate_score(&dm, 2) - 6.25).abs() < 1e-10);
/// ```
pub fn end_candidate_score(distances: &DistanceMatrix, stop: usize) -> f64 {
    let n = distances.size();
    let others = (1..n).filter(|&j| j != stop);
    let total: f64 = others.map(|j| distances.get(stop, j)).sum();
    let mean = total / n.saturating_sub(2).max(1) as f64;
    distances.get(DEPOT, stop) - CENTRALITY_WEIGHT * mean
}

/// Returns up to `k` stops ranked by descending [`end_candidate_score`].
///
/// Equal scores keep ascending index order.
pub fn best_end_candidates(distances: &DistanceMatrix, k: usize) -> Vec<usize> {
    let n = distances.size();
    let mut scored: Vec<(usize, f64)> = (1..n)
        .map(|stop| (stop, end_candidate_score(distances, stop)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k.min(n.saturating_sub(1)));
    scored.into_iter().map(|(stop, _)| stop).collect()
}

/// Grows a nearest-neighbor route that skips `end` and finishes there.
///
/// Returns `None` if `end` is the depot or out of range.
pub fn route_ending_at(distances: &DistanceMatrix, end: usize) -> Option<Route> {
    if end == DEPOT || end >= distances.size() {
        return None;
    }
    Some(grow_nearest(distances, Some(end)))
}

/// Builds one candidate route per top-scored end stop.
///
/// # Examples
///
/// ```
/// use open_route::constructive::{BestEndCandidates, Constructor};
/// use open_route::distance::DistanceMatrix;
///
/// let mut dm = DistanceMatrix::new(20);
/// for i in 0..20 {
///     for j in 0..20 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
///
/// let routes = BestEndCandidates::default().construct(&dm);
/// assert_eq!(routes.len(), 15);
/// assert_eq!(routes[0].last(), 19);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BestEndCandidates {
    max_candidates: usize,
}

impl BestEndCandidates {
    /// Explores at most `max_candidates` end stops.
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates }
    }
}

impl Default for BestEndCandidates {
    fn default() -> Self {
        Self::new(DEFAULT_END_CANDIDATES)
    }
}

impl Constructor for BestEndCandidates {
    fn name(&self) -> &'static str {
        "best-end"
    }

    fn construct(&self, distances: &DistanceMatrix) -> Vec<Route> {
        best_end_candidates(distances, self.max_candidates)
            .into_iter()
            .filter_map(|end| route_ending_at(distances, end))
            .collect()
    }
}
