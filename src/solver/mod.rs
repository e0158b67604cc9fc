//! Strategy orchestration.
//!
//! - [`OpenTspSolver`] — runs the constructor portfolio and the improvers
//!   over an [`OpenPathProblem`](crate::models::OpenPathProblem)
//! - [`SolverConfig`] — pass caps, 3-opt limits and the constructor list
//! - [`DeliveryPlanner`] — prices a depot and stops through a
//!   [`CostProvider`](crate::distance::CostProvider) and sequences them

mod config;
mod orchestrator;
mod planner;

pub use config::{SolverConfig, THREE_OPT_MAX_NODES, THREE_OPT_TIME_BUDGET};
pub use orchestrator::{OpenTspSolver, SolveTrace, Stage, ThreeOptStatus};
pub use planner::{DeliveryPlan, DeliveryPlanner};
