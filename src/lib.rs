//! # open-route
//!
//! Open-path delivery sequencing: given a depot and a set of stops, find a
//! low-cost order that starts at the depot and visits every stop once,
//! without returning.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Route, OpenPathProblem, SolutionRecord, Stop)
//! - [`distance`] — Cost matrix and the cost-provider collaborators
//! - [`geo`] — Coordinates, great-circle distance, polyline decoding
//! - [`evaluation`] — Open-path cost evaluation
//! - [`constructive`] — Constructive heuristics (Nearest Neighbor, Best End,
//!   Cheapest Insertion, Savings)
//! - [`local_search`] — Local search operators (2-opt, Or-opt, 3-opt)
//! - [`solver`] — Portfolio orchestrator and delivery planner
//! - [`error`] — Input error taxonomy
//!
//! ## Example
//!
//! ```
//! use open_route::distance::DistanceMatrix;
//! use open_route::models::OpenPathProblem;
//! use open_route::solver::OpenTspSolver;
//!
//! let mut dm = DistanceMatrix::new(5);
//! for i in 0..5 {
//!     for j in 0..5 {
//!         dm.set(i, j, (i as f64 - j as f64).abs());
//!     }
//! }
//! let problem = OpenPathProblem::from_distances(dm).unwrap();
//! let record = OpenTspSolver::default().solve(&problem).unwrap();
//! assert_eq!(record.route.as_slice(), &[0, 1, 2, 3, 4]);
//! assert_eq!(record.total_distance, 4.0);
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod geo;
pub mod local_search;
pub mod models;
pub mod solver;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Result, SolveError};
