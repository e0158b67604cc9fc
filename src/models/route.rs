//! Depot-first visiting order.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolveError};

/// Matrix index of the depot.
pub const DEPOT: usize = 0;

/// An ordered sequence of location indices starting at the depot.
///
/// For an instance with `n` locations, a route has length `n`, begins with
/// [`DEPOT`], and the remaining elements are a permutation of `1..n`.
/// Routes are plain values: every constructor builds a fresh one and every
/// improver takes one by value.
///
/// # Examples
///
/// ```
/// use open_route::models::Route;
///
/// let route = Route::new(vec![0, 2, 1, 3]).unwrap();
/// assert_eq!(route.len(), 4);
/// assert_eq!(route.last(), 3);
/// assert!(Route::new(vec![1, 0, 2]).is_err());
/// assert!(Route::new(vec![0, 2, 2]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Route(Vec<usize>);

impl Route {
    /// Validates and wraps a visiting order.
    pub fn new(order: Vec<usize>) -> Result<Self> {
        validate_order(&order)?;
        Ok(Self(order))
    }

    /// The identity order `0, 1, .., n-1`.
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Wraps an order already known to satisfy the permutation invariant.
    pub(crate) fn from_order(order: Vec<usize>) -> Self {
        debug_assert!(validate_order(&order).is_ok(), "invalid order {order:?}");
        Self(order)
    }

    /// The visiting order as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Mutable access for improvers. Callers must keep the invariant.
    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<usize> {
        &mut self.0
    }

    /// Unwraps the visiting order.
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }

    /// Number of locations, depot included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the degenerate route of a zero-location instance.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The final stop (the depot for a single-location route).
    pub fn last(&self) -> usize {
        self.0.last().copied().unwrap_or(DEPOT)
    }

    /// Stop indices in visit order, depot excluded.
    pub fn stops(&self) -> &[usize] {
        self.0.get(1..).unwrap_or(&[])
    }
}

impl TryFrom<Vec<usize>> for Route {
    type Error = SolveError;

    fn try_from(order: Vec<usize>) -> Result<Self> {
        Self::new(order)
    }
}

impl From<Route> for Vec<usize> {
    fn from(route: Route) -> Self {
        route.0
    }
}

impl AsRef<[usize]> for Route {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

fn validate_order(order: &[usize]) -> Result<()> {
    match order.first() {
        Some(&DEPOT) => {}
        Some(&other) => {
            return Err(SolveError::InvalidRoute(format!(
                "route starts at {other}, expected depot {DEPOT}"
            )))
        }
        None => return Err(SolveError::InvalidRoute("route is empty".into())),
    }
    let n = order.len();
    let mut seen = vec![false; n];
    for &idx in order {
        if idx >= n {
            return Err(SolveError::InvalidRoute(format!(
                "index {idx} out of range for {n} locations"
            )));
        }
        if seen[idx] {
            return Err(SolveError::InvalidRoute(format!("index {idx} repeated")));
        }
        seen[idx] = true;
    }
    Ok(())
}
