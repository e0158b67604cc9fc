//! Domain model types for open-path delivery sequencing.
//!
//! Provides the core abstractions: the depot-first visiting order, the pair
//! of index-aligned cost matrices a solve reads, the solution record the
//! orchestrator compares, and the caller's delivery stops.

mod problem;
mod route;
mod solution;
mod stop;

pub use problem::OpenPathProblem;
pub use route::{Route, DEPOT};
pub use solution::SolutionRecord;
pub use stop::Stop;
