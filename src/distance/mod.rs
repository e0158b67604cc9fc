//! Cost matrices and the collaborators that fill them.
//!
//! - [`DistanceMatrix`] — dense n×n cost table, used for both distances and
//!   durations
//! - [`CostProvider`] — per-leg cost lookup, with caching and fallback
//!   wrappers and a great-circle [`HaversineEstimator`]
//! - [`build_problem`] — prices every leg of a depot-plus-stops instance

mod matrix;
mod provider;

pub use matrix::DistanceMatrix;
pub use provider::{
    build_problem, CachedProvider, CostProvider, CostSource, FallbackProvider, HaversineEstimator,
    ProviderError, TravelCost, DEFAULT_DETOUR_FACTOR, DEFAULT_MINUTES_PER_KM,
};
