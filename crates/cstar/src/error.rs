//! Error type shared by the model, the resolution code and the normal form.
//!
//! Every failure is detected eagerly (at construction or at the call that
//! cannot be carried out) and surfaced to the caller; nothing is retried.

use thiserror::Error;

use crate::surface::End;

/// Result type for all fallible operations of this crate.
pub type Result<T> = std::result::Result<T, CStarError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CStarError {
    /// A defining triple needs at least two blocks.
    #[error("a C*-surface needs at least two blocks, got {0}")]
    TooFewBlocks(usize),

    #[error("block {block} has no rays")]
    EmptyBlock { block: usize },

    #[error("ray ({l}, {d}) in block {block}: l must be positive")]
    NonPositiveL { block: usize, l: i64, d: i64 },

    #[error("ray ({l}, {d}) in block {block} is not primitive (gcd = {gcd})")]
    NotCoprime {
        block: usize,
        l: i64,
        d: i64,
        gcd: i64,
    },

    #[error("block {block} is not sorted by strictly decreasing slope at ray {ray}")]
    UnsortedBlock { block: usize, ray: usize },

    /// An elliptic end needs `m⁺ > 0` (plus) or `m⁻ < 0` (minus).
    #[error("elliptic {end} end requires {requirement}, but the slope sum is {slope_sum}")]
    InvalidSlopeSum {
        end: End,
        slope_sum: String,
        requirement: &'static str,
    },

    #[error("block sizes sum to {expected} columns but the ray matrix has {actual}")]
    BlockSizeMismatch { expected: usize, actual: usize },

    #[error("ray matrix is not a valid P-matrix: {0}")]
    InvalidPMatrix(String),

    #[error("index out of range: {0}")]
    IndexError(String),

    #[error("no such fixed point: {0}")]
    NoSuchFixedPoint(String),

    /// The two generators of a 2D cone are linearly dependent.
    #[error("no unique cone spanned by {v1:?} and {v2:?}")]
    NoUniqueCone { v1: (i64, i64), v2: (i64, i64) },

    #[error("the ray through {ray:?} does not meet the line through the cone generators")]
    NoUniqueIntersection { ray: (i64, i64) },

    #[error("malformed interchange line: {0}")]
    Parse(String),

    #[error("invalid admissible operation: {0}")]
    InvalidOperation(String),

    #[error("divisor does not fit the surface: {0}")]
    ShapeMismatch(String),
}
