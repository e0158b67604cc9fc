//! Portfolio orchestrator.
//!
//! # Stages
//!
//! ```text
//! Construct → RefineTwoOpt → OrOpt → ThreeOpt (N ≤ 30) → Done
//! ```
//!
//! Every constructor runs, every candidate it returns is refined by 2-opt
//! and scored, and a single running best is kept. Or-opt and then bounded
//! 3-opt are applied to that best only, each result kept only if it lowers
//! the total distance. Instances with at most one stop skip straight to
//! `Done` with the identity order.

use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constructive::Constructor;
use crate::error::{Result, SolveError};
use crate::evaluation::RouteEvaluator;
use crate::local_search::{
    or_opt_improve_with, three_opt_improve_with, two_opt_improve_with, SearchLimits, Termination,
};
use crate::models::{OpenPathProblem, Route, SolutionRecord};

use super::config::SolverConfig;

/// Name reported as the winner of a trivial instance.
const TRIVIAL: &str = "identity";

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Running constructors.
    Construct,
    /// Refining each candidate with 2-opt and keeping the best.
    RefineTwoOpt,
    /// Or-opt on the best candidate.
    OrOpt,
    /// Bounded 3-opt on the best candidate.
    ThreeOpt,
    /// Finished.
    Done,
}

/// What happened to the 3-opt stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreeOptStatus {
    /// Trivial instance; no optimization ran.
    Skipped,
    /// The instance exceeded the configured node limit.
    TooLarge,
    /// Ran to convergence or its pass cap.
    Completed {
        /// Moves applied.
        moves: usize,
    },
    /// Stopped on its wall-clock budget.
    TimedOut {
        /// Moves applied before the deadline.
        moves: usize,
    },
}

/// Record of one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveTrace {
    /// Stages visited, in order.
    pub stages: Vec<Stage>,
    /// Candidate routes refined and scored.
    pub candidates_evaluated: usize,
    /// Constructor whose candidate won the keep-best fold.
    pub winner: String,
    /// Whether Or-opt lowered the best distance.
    pub or_opt_improved: bool,
    /// Outcome of the 3-opt stage.
    pub three_opt: ThreeOptStatus,
}

impl SolveTrace {
    fn new() -> Self {
        Self {
            stages: Vec::new(),
            candidates_evaluated: 0,
            winner: TRIVIAL.to_string(),
            or_opt_improved: false,
            three_opt: ThreeOptStatus::Skipped,
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!("stage {stage:?}");
        self.stages.push(stage);
    }
}

/// Open-path TSP solver running a portfolio of constructors and improvers.
///
/// # Examples
///
/// ```
/// use open_route::distance::DistanceMatrix;
/// use open_route::models::OpenPathProblem;
/// use open_route::solver::{OpenTspSolver, SolverConfig};
///
/// let distances = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 8.0, 9.0],
///     vec![5.0, 0.0, 4.0, 6.0],
///     vec![8.0, 4.0, 0.0, 3.0],
///     vec![9.0, 6.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// let problem = OpenPathProblem::from_distances(distances).unwrap();
///
/// let record = OpenTspSolver::new(SolverConfig::default()).solve(&problem).unwrap();
/// assert_eq!(record.route.as_slice(), &[0, 1, 2, 3]);
/// assert_eq!(record.total_distance, 12.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenTspSolver {
    config: SolverConfig,
}

impl OpenTspSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a low-cost open path starting at the depot.
    pub fn solve(&self, problem: &OpenPathProblem) -> Result<SolutionRecord> {
        self.solve_traced(problem).map(|(record, _)| record)
    }

    /// Like [`solve`](Self::solve), also returning the stage trace.
    pub fn solve_traced(&self, problem: &OpenPathProblem) -> Result<(SolutionRecord, SolveTrace)> {
        self.config.validate()?;

        let n = problem.size();
        let evaluator = RouteEvaluator::new(problem);
        let mut trace = SolveTrace::new();

        if n <= 2 {
            trace.enter(Stage::Done);
            let record = evaluator.evaluate(Route::identity(n));
            info!("trivial instance with {} stops", problem.num_stops());
            return Ok((record, trace));
        }

        let constructors: Vec<Box<dyn Constructor>> = self
            .config
            .constructors
            .iter()
            .map(|kind| kind.build(self.config.best_end_candidates))
            .collect();

        trace.enter(Stage::Construct);
        let candidates: Vec<(&'static str, Route)> = constructors
            .iter()
            .flat_map(|c| {
                let name = c.name();
                c.construct(problem.distances())
                    .into_iter()
                    .map(move |route| (name, route))
            })
            .collect();

        trace.enter(Stage::RefineTwoOpt);
        let two_opt_limits = SearchLimits::new(self.config.epsilon, self.config.two_opt_max_passes);
        let mut best: Option<(SolutionRecord, &'static str)> = None;
        for (name, route) in candidates {
            let refined = two_opt_improve_with(route, problem.distances(), &two_opt_limits);
            let record = evaluator.evaluate(refined.route);
            debug!(
                "{name}: {:.3} after {} 2-opt moves",
                record.total_distance, refined.moves
            );
            trace.candidates_evaluated += 1;
            if best.as_ref().map_or(true, |(b, _)| record.is_better_than(b)) {
                best = Some((record, name));
            }
        }
        let Some((mut best, winner)) = best else {
            // Constructors always return at least one route when n > 2.
            return Err(SolveError::NoConstructors);
        };
        trace.winner = winner.to_string();

        trace.enter(Stage::OrOpt);
        let or_opt_limits = SearchLimits::new(self.config.epsilon, self.config.or_opt_max_passes);
        let refined = or_opt_improve_with(
            best.route.clone(),
            problem.distances(),
            &or_opt_limits,
            self.config.or_opt_max_segment,
        );
        if refined.distance < best.total_distance {
            debug!("or-opt: {:.3} -> {:.3}", best.total_distance, refined.distance);
            best = evaluator.evaluate(refined.route);
            trace.or_opt_improved = true;
        }

        if n <= self.config.three_opt_max_nodes {
            trace.enter(Stage::ThreeOpt);
            let mut limits =
                SearchLimits::new(self.config.epsilon, self.config.three_opt_max_passes);
            if let Some(budget) = self.config.three_opt_time_budget {
                limits = limits.with_deadline(Instant::now() + budget);
            }
            let refined = three_opt_improve_with(best.route.clone(), problem.distances(), &limits);
            trace.three_opt = match refined.termination {
                Termination::Deadline => ThreeOptStatus::TimedOut {
                    moves: refined.moves,
                },
                _ => ThreeOptStatus::Completed {
                    moves: refined.moves,
                },
            };
            if refined.distance < best.total_distance {
                debug!("3-opt: {:.3} -> {:.3}", best.total_distance, refined.distance);
                best = evaluator.evaluate(refined.route);
            }
        } else {
            debug!("3-opt skipped: {n} locations > {}", self.config.three_opt_max_nodes);
            trace.three_opt = ThreeOptStatus::TooLarge;
        }

        trace.enter(Stage::Done);
        info!(
            "sequenced {} stops: distance {:.3}, duration {:.3} (best start: {})",
            problem.num_stops(),
            best.total_distance,
            best.total_duration,
            trace.winner
        );
        Ok((best, trace))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::constructive::ConstructorKind;
    use crate::distance::DistanceMatrix;
    use crate::evaluation::route_distance;
    use crate::local_search::{or_opt_improve, two_opt_improve};
    use crate::test_support::{arb_matrix, assert_permutation, brute_force, euclidean};

    fn solve(dm: DistanceMatrix, config: SolverConfig) -> (SolutionRecord, SolveTrace) {
        let problem = OpenPathProblem::from_distances(dm).expect("valid");
        OpenTspSolver::new(config).solve_traced(&problem).expect("solve")
    }

    #[test]
    fn test_depot_only() {
        let (record, trace) = solve(DistanceMatrix::new(1), SolverConfig::default());
        assert_eq!(record.route.as_slice(), &[0]);
        assert_eq!(record.total_distance, 0.0);
        assert_eq!(trace.stages, vec![Stage::Done]);
        assert_eq!(trace.three_opt, ThreeOptStatus::Skipped);
    }

    #[test]
    fn test_single_stop() {
        let dm = DistanceMatrix::from_rows(vec![vec![0.0, 7.5], vec![2.0, 0.0]]).expect("square");
        let (record, trace) = solve(dm, SolverConfig::default());
        assert_eq!(record.route.as_slice(), &[0, 1]);
        assert_eq!(record.total_distance, 7.5);
        assert_eq!(trace.candidates_evaluated, 0);
    }

    #[test]
    fn test_four_node_matches_brute_force() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 5.0, 8.0, 9.0],
            vec![5.0, 0.0, 4.0, 6.0],
            vec![8.0, 4.0, 0.0, 3.0],
            vec![9.0, 6.0, 3.0, 0.0],
        ])
        .expect("square");
        let optimum = brute_force(&dm);
        let (record, trace) = solve(dm, SolverConfig::default());
        assert_eq!(optimum, 12.0);
        assert_eq!(record.total_distance, optimum);
        assert_eq!(record.route.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(
            trace.stages,
            vec![
                Stage::Construct,
                Stage::RefineTwoOpt,
                Stage::OrOpt,
                Stage::ThreeOpt,
                Stage::Done
            ]
        );
        // nn, 3 best-end, insertion, savings
        assert_eq!(trace.candidates_evaluated, 6);
    }

    #[test]
    fn test_durations_follow_the_route() {
        let distances = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 1.0],
            vec![2.0, 1.0, 0.0],
        ])
        .expect("square");
        let durations = DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 1.0],
            vec![10.0, 0.0, 20.0],
            vec![1.0, 20.0, 0.0],
        ])
        .expect("square");
        let problem = OpenPathProblem::new(distances, durations).expect("valid");
        let record = OpenTspSolver::default().solve(&problem).expect("solve");
        assert_eq!(record.route.as_slice(), &[0, 1, 2]);
        assert_eq!(record.total_distance, 2.0);
        assert_eq!(record.total_duration, 30.0);
    }

    #[test]
    fn test_best_end_ablation() {
        // Every other start refines to the same 41.77 path; only the route
        // finishing at stop 4, far south of the depot, reaches the optimum.
        let dm = euclidean(&[
            (0.0, 0.0),
            (-4.0, 10.0),
            (-7.0, -3.0),
            (-1.0, 8.0),
            (-5.0, -10.0),
            (5.0, 6.0),
            (-3.0, -7.0),
        ]);
        let optimum = brute_force(&dm);
        let (with, trace) = solve(dm.clone(), SolverConfig::default());
        let without_config = SolverConfig::default().without_constructor(ConstructorKind::BestEnd);
        let (without, _) = solve(dm, without_config);

        assert!(with.total_distance <= without.total_distance);
        assert!(with.total_distance < without.total_distance - 0.5);
        assert!((with.total_distance - optimum).abs() < 1e-9);
        assert_eq!(with.route.last(), 4);
        assert_eq!(trace.winner, "best-end");
    }

    #[test]
    fn test_three_opt_skipped_above_limit() {
        let mut rng = StdRng::seed_from_u64(40);
        let points: Vec<(f64, f64)> = (0..40)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let dm = euclidean(&points);
        let (record, trace) = solve(dm.clone(), SolverConfig::default());

        assert_permutation(&record.route, 40);
        assert_eq!(trace.three_opt, ThreeOptStatus::TooLarge);
        assert!(!trace.stages.contains(&Stage::ThreeOpt));
        assert_eq!(trace.stages.last(), Some(&Stage::Done));
        let recomputed = route_distance(record.route.as_slice(), &dm);
        assert!((record.total_distance - recomputed).abs() < 1e-9);

        let (_, nearest) = two_opt_improve(crate::constructive::nearest_neighbor(&dm), &dm);
        assert!(record.total_distance <= nearest + 1e-9);

        // Or-opt ran last and converged.
        let (_, relocated) = or_opt_improve(record.route.clone(), &dm);
        assert!((relocated - record.total_distance).abs() < 1e-9);
    }

    #[test]
    fn test_three_opt_time_budget_reported() {
        let dm = euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let config = SolverConfig::default().with_three_opt_time_budget(Some(Duration::ZERO));
        let (record, trace) = solve(dm, config);
        assert_eq!(trace.three_opt, ThreeOptStatus::TimedOut { moves: 0 });
        assert_eq!(record.total_distance, 3.0);
    }

    #[test]
    fn test_no_constructors() {
        let problem = OpenPathProblem::from_distances(DistanceMatrix::new(3)).expect("valid");
        let solver = OpenTspSolver::new(SolverConfig::default().with_constructors(Vec::new()));
        assert_eq!(solver.solve(&problem), Err(SolveError::NoConstructors));
    }

    #[test]
    fn test_single_constructor_portfolio() {
        let dm = euclidean(&[(0.0, 0.0), (3.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let config = SolverConfig::default().with_constructors(vec![ConstructorKind::Savings]);
        let (record, trace) = solve(dm, config);
        assert_eq!(trace.winner, "savings");
        assert_eq!(trace.candidates_evaluated, 1);
        assert_eq!(record.route.as_slice(), &[0, 2, 3, 1]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_solver_beats_every_refined_constructor(dm in arb_matrix(9)) {
            let n = dm.size();
            let (record, _) = solve(dm.clone(), SolverConfig::default());
            assert_permutation(&record.route, n);
            prop_assert!(record.total_distance + 1e-9 >= brute_force(&dm));
            for kind in ConstructorKind::all() {
                for route in kind.build(15).construct(&dm) {
                    let (refined, cost) = two_opt_improve(route, &dm);
                    prop_assert!(record.total_distance <= cost + 1e-9, "{:?}", refined);
                }
            }
        }
    }
}
