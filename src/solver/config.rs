//! Solver tuning knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constructive::{ConstructorKind, DEFAULT_END_CANDIDATES};
use crate::error::{Result, SolveError};
use crate::local_search::{
    DEFAULT_EPSILON, OR_OPT_MAX_PASSES, OR_OPT_MAX_SEGMENT, THREE_OPT_MAX_PASSES,
    TWO_OPT_MAX_PASSES,
};

/// Largest instance (depot included) on which 3-opt runs by default.
pub const THREE_OPT_MAX_NODES: usize = 30;

/// Default wall-clock budget for the 3-opt stage.
pub const THREE_OPT_TIME_BUDGET: Duration = Duration::from_secs(5);

/// Configuration for [`OpenTspSolver`](super::OpenTspSolver).
///
/// Missing fields take their defaults when deserializing.
///
/// # Examples
///
/// ```
/// use open_route::constructive::ConstructorKind;
/// use open_route::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_constructors(vec![ConstructorKind::NearestNeighbor])
///     .with_three_opt_max_nodes(12);
/// assert_eq!(config.three_opt_max_nodes, 12);
/// assert_eq!(config.two_opt_max_passes, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Minimum cost decrease for a move to count as improving.
    pub epsilon: f64,
    /// Cap on applied 2-opt moves per candidate.
    pub two_opt_max_passes: usize,
    /// Cap on applied Or-opt moves.
    pub or_opt_max_passes: usize,
    /// Longest segment Or-opt relocates.
    pub or_opt_max_segment: usize,
    /// Cap on applied 3-opt moves.
    pub three_opt_max_passes: usize,
    /// 3-opt runs only when the instance has at most this many locations.
    pub three_opt_max_nodes: usize,
    /// Wall-clock budget for 3-opt; `None` runs to convergence or pass cap.
    pub three_opt_time_budget: Option<Duration>,
    /// Number of end stops the best-end constructor explores.
    pub best_end_candidates: usize,
    /// Constructors run, in order.
    pub constructors: Vec<ConstructorKind>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            two_opt_max_passes: TWO_OPT_MAX_PASSES,
            or_opt_max_passes: OR_OPT_MAX_PASSES,
            or_opt_max_segment: OR_OPT_MAX_SEGMENT,
            three_opt_max_passes: THREE_OPT_MAX_PASSES,
            three_opt_max_nodes: THREE_OPT_MAX_NODES,
            three_opt_time_budget: Some(THREE_OPT_TIME_BUDGET),
            best_end_candidates: DEFAULT_END_CANDIDATES,
            constructors: ConstructorKind::all(),
        }
    }
}

impl SolverConfig {
    /// Sets the improvement threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the 2-opt move cap.
    pub fn with_two_opt_max_passes(mut self, passes: usize) -> Self {
        self.two_opt_max_passes = passes;
        self
    }

    /// Sets the Or-opt move cap.
    pub fn with_or_opt_max_passes(mut self, passes: usize) -> Self {
        self.or_opt_max_passes = passes;
        self
    }

    /// Sets the longest Or-opt segment.
    pub fn with_or_opt_max_segment(mut self, len: usize) -> Self {
        self.or_opt_max_segment = len;
        self
    }

    /// Sets the 3-opt move cap.
    pub fn with_three_opt_max_passes(mut self, passes: usize) -> Self {
        self.three_opt_max_passes = passes;
        self
    }

    /// Sets the largest instance 3-opt runs on.
    pub fn with_three_opt_max_nodes(mut self, nodes: usize) -> Self {
        self.three_opt_max_nodes = nodes;
        self
    }

    /// Sets or removes the 3-opt wall-clock budget.
    pub fn with_three_opt_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.three_opt_time_budget = budget;
        self
    }

    /// Sets how many end stops the best-end constructor explores.
    pub fn with_best_end_candidates(mut self, k: usize) -> Self {
        self.best_end_candidates = k;
        self
    }

    /// Replaces the constructor portfolio.
    pub fn with_constructors(mut self, constructors: Vec<ConstructorKind>) -> Self {
        self.constructors = constructors;
        self
    }

    /// Drops one constructor from the portfolio.
    pub fn without_constructor(mut self, kind: ConstructorKind) -> Self {
        self.constructors.retain(|&k| k != kind);
        self
    }

    /// Rejects configurations that cannot produce a route.
    pub fn validate(&self) -> Result<()> {
        if self.constructors.is_empty() {
            return Err(SolveError::NoConstructors);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.epsilon, 1e-3);
        assert_eq!(config.or_opt_max_passes, 500);
        assert_eq!(config.or_opt_max_segment, 3);
        assert_eq!(config.three_opt_max_passes, 100);
        assert_eq!(config.three_opt_max_nodes, 30);
        assert_eq!(config.best_end_candidates, 15);
        assert_eq!(config.constructors.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SolverConfig = serde_json::from_str(
            r#"{"three_opt_max_nodes": 10, "constructors": ["savings", "best-end"]}"#,
        )
        .expect("deserialize");
        assert_eq!(config.three_opt_max_nodes, 10);
        assert_eq!(
            config.constructors,
            vec![ConstructorKind::Savings, ConstructorKind::BestEnd]
        );
        assert_eq!(config.two_opt_max_passes, 1000);
        assert_eq!(config.three_opt_time_budget, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_without_constructor() {
        let config = SolverConfig::default().without_constructor(ConstructorKind::BestEnd);
        assert_eq!(config.constructors.len(), 3);
        assert!(!config.constructors.contains(&ConstructorKind::BestEnd));
    }

    #[test]
    fn test_empty_portfolio_rejected() {
        let config = SolverConfig::default().with_constructors(Vec::new());
        assert_eq!(config.validate(), Err(SolveError::NoConstructors));
    }
}
