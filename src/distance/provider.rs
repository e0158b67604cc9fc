//! Pairwise travel-cost lookup between coordinates.
//!
//! A [`CostProvider`] prices one directed leg at a time. Real-road routing
//! services implement it outside this crate; [`HaversineEstimator`] is the
//! built-in great-circle fallback. [`CachedProvider`] and
//! [`FallbackProvider`] wrap any provider, and [`build_problem`] turns a
//! depot plus stops into a validated [`OpenPathProblem`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::distance::DistanceMatrix;
use crate::error::SolveError;
use crate::geo::GeoPoint;
use crate::models::OpenPathProblem;

/// Default ratio of road distance to great-circle distance.
pub const DEFAULT_DETOUR_FACTOR: f64 = 1.3;

/// Default minutes of driving per estimated kilometre.
pub const DEFAULT_MINUTES_PER_KM: f64 = 2.0;

/// Distance (km) and duration (minutes) of one directed leg.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TravelCost {
    /// Kilometres.
    pub distance: f64,
    /// Minutes.
    pub duration: f64,
}

impl TravelCost {
    /// Creates a leg cost.
    pub fn new(distance: f64, duration: f64) -> Self {
        Self { distance, duration }
    }
}

/// Where a provider's numbers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostSource {
    /// A road-network routing service.
    Road,
    /// A great-circle estimate.
    Estimated,
}

/// A provider could not price a leg.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

/// Prices directed legs between coordinates.
pub trait CostProvider: Send + Sync {
    /// Travel cost from `from` to `to`.
    fn cost(&self, from: &GeoPoint, to: &GeoPoint) -> Result<TravelCost, ProviderError>;

    /// Provenance of the costs returned since the last
    /// [`begin_batch`](Self::begin_batch).
    fn source(&self) -> CostSource;

    /// Called before a new matrix is priced. Stateful providers reset
    /// per-batch bookkeeping here.
    fn begin_batch(&self) {}
}

/// Great-circle estimate inflated by a road detour factor.
///
/// # Examples
///
/// ```
/// use open_route::distance::{CostProvider, HaversineEstimator};
/// use open_route::geo::GeoPoint;
///
/// let est = HaversineEstimator::default();
/// let leg = est.cost(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(1.0, 0.0)).unwrap();
/// // 111.19 km * 1.3
/// assert!((leg.distance - 144.55).abs() < 0.01);
/// assert!((leg.duration - 2.0 * leg.distance).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaversineEstimator {
    /// Multiplier applied to the great-circle distance.
    pub detour_factor: f64,
    /// Minutes per estimated kilometre.
    pub minutes_per_km: f64,
}

impl HaversineEstimator {
    /// Creates an estimator with explicit constants.
    pub fn new(detour_factor: f64, minutes_per_km: f64) -> Self {
        Self {
            detour_factor,
            minutes_per_km,
        }
    }
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_DETOUR_FACTOR, DEFAULT_MINUTES_PER_KM)
    }
}

impl CostProvider for HaversineEstimator {
    fn cost(&self, from: &GeoPoint, to: &GeoPoint) -> Result<TravelCost, ProviderError> {
        let distance = from.haversine_km(to) * self.detour_factor;
        Ok(TravelCost::new(distance, distance * self.minutes_per_km))
    }

    fn source(&self) -> CostSource {
        CostSource::Estimated
    }
}

type LegKey = ((u64, u64), (u64, u64));

/// Memoizes another provider's answers by exact coordinate pair.
///
/// Entries never expire; call [`clear`](Self::clear) when the depot moves.
/// Failed lookups are not cached. Place the cache around the road provider
/// inside a [`FallbackProvider`], not around the fallback wrapper, so that
/// cached estimates are never reported as road costs.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    cache: Mutex<HashMap<LegKey, TravelCost>>,
}

impl<P: CostProvider> CachedProvider<P> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drops every cached leg.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached legs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<LegKey, TravelCost>> {
        // The map holds plain values, so a poisoned lock is still usable.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<P: CostProvider> CostProvider for CachedProvider<P> {
    fn cost(&self, from: &GeoPoint, to: &GeoPoint) -> Result<TravelCost, ProviderError> {
        let key = (from.key(), to.key());
        if let Some(&hit) = self.lock().get(&key) {
            return Ok(hit);
        }
        let cost = self.inner.cost(from, to)?;
        self.lock().insert(key, cost);
        Ok(cost)
    }

    fn source(&self) -> CostSource {
        self.inner.source()
    }

    fn begin_batch(&self) {
        self.inner.begin_batch();
    }
}

/// Asks `primary` first and answers from `fallback` when it fails.
#[derive(Debug)]
pub struct FallbackProvider<P, F> {
    primary: P,
    fallback: F,
    fell_back: AtomicBool,
}

impl<P: CostProvider, F: CostProvider> FallbackProvider<P, F> {
    /// Pairs a primary provider with its fallback.
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
            fell_back: AtomicBool::new(false),
        }
    }

    /// Returns `true` once any lookup has been answered by the fallback.
    pub fn used_fallback(&self) -> bool {
        self.fell_back.load(Ordering::Relaxed)
    }

    /// Forgets earlier fallbacks.
    pub fn reset(&self) {
        self.fell_back.store(false, Ordering::Relaxed);
    }
}

impl<P: CostProvider, F: CostProvider> CostProvider for FallbackProvider<P, F> {
    fn cost(&self, from: &GeoPoint, to: &GeoPoint) -> Result<TravelCost, ProviderError> {
        match self.primary.cost(from, to) {
            Ok(cost) => Ok(cost),
            Err(err) => {
                warn!("cost lookup failed ({err}), falling back to estimate");
                self.fell_back.store(true, Ordering::Relaxed);
                self.fallback.cost(from, to)
            }
        }
    }

    fn source(&self) -> CostSource {
        if self.used_fallback() {
            self.fallback.source()
        } else {
            self.primary.source()
        }
    }

    fn begin_batch(&self) {
        self.reset();
        self.primary.begin_batch();
        self.fallback.begin_batch();
    }
}

/// Prices every directed leg between `depot` and `stops` and returns the
/// validated instance. Index 0 is the depot, index `i` is `stops[i - 1]`.
///
/// Starts a new provider batch, so the provider's
/// [`source`](CostProvider::source) afterwards describes this matrix only.
/// Fails on the first lookup error.
///
/// # Examples
///
/// ```
/// use open_route::distance::{build_problem, HaversineEstimator};
/// use open_route::geo::GeoPoint;
///
/// let depot = GeoPoint::new(34.74, 10.76);
/// let stops = [GeoPoint::new(34.75, 10.77), GeoPoint::new(34.80, 10.70)];
/// let problem = build_problem(&depot, &stops, &HaversineEstimator::default()).unwrap();
/// assert_eq!(problem.size(), 3);
/// assert_eq!(problem.distances().get(1, 1), 0.0);
/// ```
pub fn build_problem<P: CostProvider + ?Sized>(
    depot: &GeoPoint,
    stops: &[GeoPoint],
    provider: &P,
) -> crate::error::Result<OpenPathProblem> {
    provider.begin_batch();
    let points: Vec<&GeoPoint> = std::iter::once(depot).chain(stops).collect();
    let n = points.len();
    let mut distances = DistanceMatrix::new(n);
    let mut durations = DistanceMatrix::new(n);

    for (from, a) in points.iter().enumerate() {
        for (to, b) in points.iter().enumerate() {
            if from == to {
                continue;
            }
            let leg = provider.cost(a, b).map_err(|err| SolveError::CostLookup {
                from,
                to,
                reason: err.to_string(),
            })?;
            distances.set(from, to, leg.distance);
            durations.set(from, to, leg.duration);
        }
    }

    debug!(
        "priced {} legs for {} locations ({:?})",
        n * (n - 1),
        n,
        provider.source()
    );
    OpenPathProblem::new(distances, durations)
}
