//! Route evaluator for open paths.

use crate::distance::DistanceMatrix;
use crate::models::{OpenPathProblem, Route, SolutionRecord};

/// Computes the open-path cost of a visiting order:
/// `cost[r0][r1] + cost[r1][r2] + ... + cost[r(n-2)][r(n-1)]`.
///
/// There is no closing edge from the last stop back to the depot.
///
/// # Examples
///
/// ```
/// use open_route::distance::DistanceMatrix;
/// use open_route::evaluation::route_distance;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 8.0],
///     vec![5.0, 0.0, 4.0],
///     vec![8.0, 4.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(route_distance(&[0, 1, 2], &dm), 9.0);
/// assert_eq!(route_distance(&[0], &dm), 0.0);
/// ```
pub fn route_distance(route: &[usize], distances: &DistanceMatrix) -> f64 {
    route.windows(2).map(|w| distances.get(w[0], w[1])).sum()
}

/// Turns routes into [`SolutionRecord`]s using a problem's two matrices.
///
/// # Examples
///
/// ```
/// use open_route::distance::DistanceMatrix;
/// use open_route::evaluation::RouteEvaluator;
/// use open_route::models::{OpenPathProblem, Route};
///
/// let distances = DistanceMatrix::from_rows(vec![vec![0.0, 3.0], vec![3.0, 0.0]]).unwrap();
/// let durations = DistanceMatrix::from_rows(vec![vec![0.0, 6.0], vec![6.0, 0.0]]).unwrap();
/// let problem = OpenPathProblem::new(distances, durations).unwrap();
///
/// let record = RouteEvaluator::new(&problem).evaluate(Route::identity(2));
/// assert_eq!(record.total_distance, 3.0);
/// assert_eq!(record.total_duration, 6.0);
/// ```
pub struct RouteEvaluator<'a> {
    problem: &'a OpenPathProblem,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates an evaluator over the given problem.
    pub fn new(problem: &'a OpenPathProblem) -> Self {
        Self { problem }
    }

    /// Open-path distance of `route`.
    pub fn distance(&self, route: &Route) -> f64 {
        route_distance(route.as_slice(), self.problem.distances())
    }

    /// Open-path duration of `route`, re-summed along the same sequence.
    pub fn duration(&self, route: &Route) -> f64 {
        route_distance(route.as_slice(), self.problem.durations())
    }

    /// Builds the record for `route`.
    pub fn evaluate(&self, route: Route) -> SolutionRecord {
        let total_distance = self.distance(&route);
        let total_duration = self.duration(&route);
        SolutionRecord::new(route, total_distance, total_duration)
    }
}
