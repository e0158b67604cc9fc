//! Constructive heuristics for building initial open-path routes.
//!
//! - [`nearest_neighbor`] — Greedy nearest unvisited stop, O(n²)
//! - [`BestEndCandidates`] — Nearest-neighbor growth toward each of the top-scored
//!   final stops, O(k·n²)
//! - [`cheapest_insertion`] — Globally cheapest (stop, position) insertion,
//!   O(n³)
//! - [`open_savings`] — Clarke-Wright style savings merge adapted to open
//!   paths, O(n² log n)
//!
//! Each heuristic is also exposed through the [`Constructor`] trait so the
//! solver can iterate over a portfolio without naming them individually.

mod best_end;
mod cheapest_insertion;
mod nearest_neighbor;
mod savings;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::models::Route;

pub use best_end::{
    best_end_candidates, end_candidate_score, route_ending_at, BestEndCandidates,
    DEFAULT_END_CANDIDATES,
};
pub use cheapest_insertion::{cheapest_insertion, CheapestInsertion};
pub use nearest_neighbor::{nearest_neighbor, NearestNeighbor};
pub use savings::{open_savings, Fragment, FragmentSet, MergeRejection, OpenSavings};

/// A route-construction strategy.
///
/// Implementations are pure: they read the distance matrix and return
/// freshly built routes, each a depot-first permutation of all indices.
/// A strategy may return several candidates.
pub trait Constructor: Send + Sync {
    /// Short name used in logs and solve traces.
    fn name(&self) -> &'static str;

    /// Builds one or more candidate routes.
    fn construct(&self, distances: &DistanceMatrix) -> Vec<Route>;
}

/// Configurable selector for the built-in constructors.
///
/// # Examples
///
/// ```
/// use open_route::constructive::ConstructorKind;
///
/// let all = ConstructorKind::all();
/// assert_eq!(all.len(), 4);
/// assert_eq!(ConstructorKind::Savings.build(15).name(), "savings");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructorKind {
    /// [`NearestNeighbor`].
    NearestNeighbor,
    /// [`BestEndCandidates`].
    BestEnd,
    /// [`CheapestInsertion`].
    CheapestInsertion,
    /// [`OpenSavings`].
    Savings,
}

impl ConstructorKind {
    /// Every built-in constructor, in the order the solver runs them.
    pub fn all() -> Vec<Self> {
        vec![
            Self::NearestNeighbor,
            Self::BestEnd,
            Self::CheapestInsertion,
            Self::Savings,
        ]
    }

    /// Instantiates the strategy. `end_candidates` bounds
    /// [`BestEndCandidates`] and is ignored by the others.
    pub fn build(self, end_candidates: usize) -> Box<dyn Constructor> {
        match self {
            Self::NearestNeighbor => Box::new(NearestNeighbor),
            Self::BestEnd => Box::new(BestEndCandidates::new(end_candidates)),
            Self::CheapestInsertion => Box::new(CheapestInsertion),
            Self::Savings => Box::new(OpenSavings),
        }
    }
}
