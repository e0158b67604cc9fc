//! Local search operators for improving open-path routes.
//!
//! - [`two_opt_improve`] — Open-path 2-opt subrange reversal
//! - [`or_opt_improve`] — Segment relocation (lengths 1–3)
//! - [`three_opt_improve`] — Bounded 3-opt with two reversal reconnections
//!
//! Every operator takes a [`Route`](crate::models::Route) by value, applies
//! first-improvement moves that lower the open-path cost by more than
//! `epsilon`, and hands the route back. The depot at position 0 is never
//! moved.

mod or_opt;
mod three_opt;
mod two_opt;

use std::time::Instant;

use crate::distance::DistanceMatrix;
use crate::models::Route;

pub use or_opt::{or_opt_improve, or_opt_improve_with, OR_OPT_MAX_PASSES, OR_OPT_MAX_SEGMENT};
pub use three_opt::{three_opt_improve, three_opt_improve_with, THREE_OPT_MAX_PASSES};
pub use two_opt::{two_opt_improve, two_opt_improve_with, TWO_OPT_MAX_PASSES};

/// Minimum cost decrease for a move to be applied.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// Tolerance used to decide whether a matrix is symmetric.
pub(crate) const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Bounds on a single improver run.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use open_route::local_search::SearchLimits;
///
/// let limits = SearchLimits::new(1e-3, 100)
///     .with_deadline(Instant::now() + Duration::from_secs(1));
/// assert_eq!(limits.max_passes, 100);
/// assert!(!limits.expired());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchLimits {
    /// A move is applied only when its delta is below `-epsilon`.
    pub epsilon: f64,
    /// Maximum number of improving moves applied.
    pub max_passes: usize,
    /// Optional wall-clock cut-off.
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    /// Creates limits without a deadline.
    pub fn new(epsilon: f64, max_passes: usize) -> Self {
        Self {
            epsilon,
            max_passes,
            deadline: None,
        }
    }

    /// Adds a wall-clock deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns `true` once the deadline has passed.
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Why an improver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A full scan found no improving move.
    Converged,
    /// The pass cap was reached.
    PassCap,
    /// The deadline expired.
    Deadline,
}

/// Result of an improver run.
#[derive(Debug, Clone)]
pub struct Improvement {
    /// The improved route.
    pub route: Route,
    /// Its open-path distance.
    pub distance: f64,
    /// Number of improving moves applied.
    pub moves: usize,
    /// Why the search stopped.
    pub termination: Termination,
}

/// Cost change of the edges strictly inside `route[from..=to]` when that
/// span is reversed. Zero on symmetric matrices.
pub(crate) fn reversal_interior_delta(
    route: &[usize],
    from: usize,
    to: usize,
    distances: &DistanceMatrix,
) -> f64 {
    (from..to)
        .map(|k| distances.get(route[k + 1], route[k]) - distances.get(route[k], route[k + 1]))
        .sum()
}
