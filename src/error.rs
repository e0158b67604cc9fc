//! Error type shared by the solver and its cost-matrix collaborators.

use thiserror::Error;

/// Errors raised before any optimization starts.
///
/// Every variant describes invalid input: a malformed or incomplete cost
/// matrix, an unusable configuration, or a failed cost lookup. Trivial
/// instances and local searches that find no improving move are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The matrix has no rows, so there is no depot at index 0.
    #[error("cost matrix is empty: index 0 must be the depot")]
    EmptyMatrix,

    /// Raw matrix data does not form a square table.
    #[error("cost matrix data has {actual} entries, expected {expected}")]
    MalformedMatrix {
        /// Entry count required for a square matrix.
        expected: usize,
        /// Entry count actually supplied.
        actual: usize,
    },

    /// Distance and duration matrices are not index-aligned.
    #[error("distance matrix is {distance}x{distance} but duration matrix is {duration}x{duration}")]
    DimensionMismatch {
        /// Size of the distance matrix.
        distance: usize,
        /// Size of the duration matrix.
        duration: usize,
    },

    /// A matrix entry is negative, NaN or infinite.
    #[error("invalid cost {value} from {from} to {to}")]
    InvalidCost {
        /// Row index.
        from: usize,
        /// Column index.
        to: usize,
        /// Offending value.
        value: f64,
    },

    /// A sequence is not a depot-first permutation of the matrix indices.
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// A plan was requested with no delivery stops.
    #[error("no delivery stops to sequence")]
    NoStops,

    /// The solver configuration enables no constructor.
    #[error("solver configuration enables no constructor")]
    NoConstructors,

    /// The cost collaborator could not price a leg.
    #[error("cost lookup from {from} to {to} failed: {reason}")]
    CostLookup {
        /// Origin location index.
        from: usize,
        /// Destination location index.
        to: usize,
        /// Collaborator-supplied reason.
        reason: String,
    },

    /// An encoded polyline is malformed or overflows an `i64`.
    #[error("invalid encoded polyline at byte {offset}")]
    InvalidPolyline {
        /// Byte offset where decoding stopped.
        offset: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolveError>;
