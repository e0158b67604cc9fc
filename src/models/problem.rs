//! Open-path problem instance.

use crate::distance::DistanceMatrix;
use crate::error::{Result, SolveError};

/// One open-path sequencing instance: index-aligned distance and duration
/// matrices over the depot (index 0) and the delivery stops.
///
/// All routing decisions read [`distances`](Self::distances); durations are
/// carried for reporting only. Both matrices are validated on construction,
/// so every instance handed to the solver is square, aligned, finite and
/// non-negative.
///
/// # Examples
///
/// ```
/// use open_route::distance::DistanceMatrix;
/// use open_route::models::OpenPathProblem;
///
/// let distances = DistanceMatrix::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
/// let durations = DistanceMatrix::from_rows(vec![vec![0.0, 4.0], vec![4.0, 0.0]]).unwrap();
/// let problem = OpenPathProblem::new(distances, durations).unwrap();
/// assert_eq!(problem.size(), 2);
/// assert_eq!(problem.num_stops(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct OpenPathProblem {
    distances: DistanceMatrix,
    durations: DistanceMatrix,
}

impl OpenPathProblem {
    /// Validates and pairs the two matrices.
    pub fn new(distances: DistanceMatrix, durations: DistanceMatrix) -> Result<Self> {
        if distances.size() == 0 {
            return Err(SolveError::EmptyMatrix);
        }
        if distances.size() != durations.size() {
            return Err(SolveError::DimensionMismatch {
                distance: distances.size(),
                duration: durations.size(),
            });
        }
        distances.validate()?;
        durations.validate()?;
        Ok(Self {
            distances,
            durations,
        })
    }

    /// Builds an instance with an all-zero duration matrix.
    pub fn from_distances(distances: DistanceMatrix) -> Result<Self> {
        let durations = DistanceMatrix::new(distances.size());
        Self::new(distances, durations)
    }

    /// Number of locations, depot included (N).
    pub fn size(&self) -> usize {
        self.distances.size()
    }

    /// Number of delivery stops (N - 1).
    pub fn num_stops(&self) -> usize {
        self.size() - 1
    }

    /// The matrix every routing decision reads.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// The reporting-only duration matrix.
    pub fn durations(&self) -> &DistanceMatrix {
        &self.durations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        let err = OpenPathProblem::from_distances(DistanceMatrix::new(0)).unwrap_err();
        assert_eq!(err, SolveError::EmptyMatrix);
    }

    #[test]
    fn test_rejects_misaligned() {
        let err = OpenPathProblem::new(DistanceMatrix::new(3), DistanceMatrix::new(2)).unwrap_err();
        assert_eq!(
            err,
            SolveError::DimensionMismatch {
                distance: 3,
                duration: 2
            }
        );
    }

    #[test]
    fn test_rejects_bad_duration() {
        let mut durations = DistanceMatrix::new(2);
        durations.set(0, 1, f64::NAN);
        assert!(OpenPathProblem::new(DistanceMatrix::new(2), durations).is_err());
    }

    #[test]
    fn test_depot_only() {
        let p = OpenPathProblem::from_distances(DistanceMatrix::new(1)).expect("valid");
        assert_eq!(p.size(), 1);
        assert_eq!(p.num_stops(), 0);
    }
}
