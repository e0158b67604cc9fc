//! Depot-and-stops façade over the cost provider and the solver.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::distance::{build_problem, CostProvider, CostSource};
use crate::error::{Result, SolveError};
use crate::geo::GeoPoint;
use crate::models::{Route, Stop};

use super::config::SolverConfig;
use super::orchestrator::OpenTspSolver;

/// A sequenced delivery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPlan {
    /// Stop identifiers in visit order, depot excluded.
    pub stop_ids: Vec<String>,
    /// Matrix indices in visit order, depot first.
    pub sequence: Route,
    /// Open-path distance in the provider's unit (km).
    pub total_distance: f64,
    /// Open-path duration in the provider's unit (minutes).
    pub total_duration: f64,
    /// Whether the costs came from the road network or an estimate.
    pub source: CostSource,
    /// Depot followed by the stops in visit order, for requesting a road
    /// geometry of the final run.
    pub waypoints: Vec<GeoPoint>,
}

/// Prices a depot-plus-stops instance and sequences it.
///
/// # Examples
///
/// ```
/// use open_route::distance::{CostSource, HaversineEstimator};
/// use open_route::geo::GeoPoint;
/// use open_route::models::Stop;
/// use open_route::solver::DeliveryPlanner;
///
/// let planner = DeliveryPlanner::new(HaversineEstimator::default());
/// let depot = GeoPoint::new(34.74, 10.76);
/// let stops = vec![
///     Stop::new("far", 34.90, 10.76),
///     Stop::new("near", 34.76, 10.76),
///     Stop::new("mid", 34.82, 10.76),
/// ];
///
/// let plan = planner.plan(&depot, &stops).unwrap();
/// assert_eq!(plan.stop_ids, vec!["near", "mid", "far"]);
/// assert_eq!(plan.source, CostSource::Estimated);
/// assert_eq!(plan.waypoints.len(), 4);
/// ```
#[derive(Debug)]
pub struct DeliveryPlanner<P> {
    provider: P,
    solver: OpenTspSolver,
}

impl<P: CostProvider> DeliveryPlanner<P> {
    /// Creates a planner with the default solver configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SolverConfig::default())
    }

    /// Creates a planner with an explicit solver configuration.
    pub fn with_config(provider: P, config: SolverConfig) -> Self {
        Self {
            provider,
            solver: OpenTspSolver::new(config),
        }
    }

    /// The cost provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sequences `stops` starting from `depot`.
    ///
    /// Fails with [`SolveError::NoStops`] on an empty list and with
    /// [`SolveError::CostLookup`] if any leg cannot be priced.
    pub fn plan(&self, depot: &GeoPoint, stops: &[Stop]) -> Result<DeliveryPlan> {
        if stops.is_empty() {
            return Err(SolveError::NoStops);
        }

        let locations: Vec<GeoPoint> = stops.iter().map(|s| s.location).collect();
        let problem = build_problem(depot, &locations, &self.provider)?;
        let source = self.provider.source();
        debug!("pricing done for {} stops ({source:?})", stops.len());

        let record = self.solver.solve(&problem)?;
        let stop_ids = record
            .route
            .stops()
            .iter()
            .map(|&i| stops[i - 1].id.clone())
            .collect();
        let waypoints = std::iter::once(*depot)
            .chain(record.route.stops().iter().map(|&i| locations[i - 1]))
            .collect();

        Ok(DeliveryPlan {
            stop_ids,
            sequence: record.route,
            total_distance: record.total_distance,
            total_duration: record.total_duration,
            source,
            waypoints,
        })
    }
}
