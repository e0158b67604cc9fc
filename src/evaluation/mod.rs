//! Open-path cost evaluation.
//!
//! The evaluator is the single comparison function used by constructors,
//! improvers and the orchestrator.

mod evaluator;

pub use evaluator::{route_distance, RouteEvaluator};
