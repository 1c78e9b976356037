//! Canonical resolution and the singularity invariants read off from it.

use std::cmp::Ordering;
use std::fmt;

use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fixed_point::assemble;
use crate::arith::{int, Rational};
use crate::error::{CStarError, Result};
use crate::surface::{CStarSurface, Divisor, PrimeSlot};

/// A resolved surface with its exceptional divisors and their discrepancies.
///
/// Invariants:
/// - `exceptional.len() == discrepancies.len()`;
/// - every exceptional divisor is prime on `surface`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub surface: CStarSurface,
    pub exceptional: Vec<Divisor>,
    pub discrepancies: Vec<Rational>,
}

impl Resolution {
    /// The trivial resolution of an already smooth surface.
    pub fn identity(x: &CStarSurface) -> Self {
        Self {
            surface: x.clone(),
            exceptional: Vec::new(),
            discrepancies: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.exceptional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exceptional.is_empty()
    }

    /// Prime slots of the exceptional divisors on `surface`, in order.
    pub fn exceptional_slots(&self) -> Result<Vec<PrimeSlot>> {
        self.exceptional
            .iter()
            .map(|e| {
                e.prime_slot().ok_or_else(|| {
                    CStarError::ShapeMismatch("exceptional divisor is not prime".into())
                })
            })
            .collect()
    }

    /// Self-intersection numbers of the exceptional divisors, in order.
    pub fn self_intersections(&self) -> Result<Vec<Rational>> {
        let m = self.surface.intersection_matrix();
        self.exceptional_slots()?
            .into_iter()
            .map(|s| m.self_intersection(s).cloned())
            .collect()
    }
}

/// Resolve every fixed point of `x` at once.
///
/// Order of the exceptional divisors: elliptic plus, elliptic minus, hyperbolic
/// points in block/ray order, parabolic plus, parabolic minus; within one
/// point block rays first, then the new apex.
pub fn canonical_resolution(x: &CStarSurface) -> Result<Resolution> {
    let insertions = x
        .fixed_points()
        .iter()
        .map(|p| p.insertion(x))
        .collect::<Result<Vec<_>>>()?;
    let res = assemble(x, &insertions)?;
    debug!(
        surface = %x,
        exceptional = res.len(),
        "canonical resolution"
    );
    Ok(res)
}

/// Log canonicity: `min(discrepancy + 1)` over the canonical resolution, or
/// `Infinite` when there is nothing to resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogCanonicity {
    Finite(Rational),
    Infinite,
}

impl LogCanonicity {
    fn exceeds(&self, bound: &Rational) -> bool {
        match self {
            LogCanonicity::Finite(q) => q > bound,
            LogCanonicity::Infinite => true,
        }
    }
}

impl PartialOrd for LogCanonicity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogCanonicity {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LogCanonicity::Finite(a), LogCanonicity::Finite(b)) => a.cmp(b),
            (LogCanonicity::Finite(_), LogCanonicity::Infinite) => Ordering::Less,
            (LogCanonicity::Infinite, LogCanonicity::Finite(_)) => Ordering::Greater,
            (LogCanonicity::Infinite, LogCanonicity::Infinite) => Ordering::Equal,
        }
    }
}

impl fmt::Display for LogCanonicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogCanonicity::Finite(q) => write!(f, "{q}"),
            LogCanonicity::Infinite => f.write_str("inf"),
        }
    }
}

pub fn log_canonicity(x: &CStarSurface) -> Result<LogCanonicity> {
    let res = canonical_resolution(x)?;
    Ok(res
        .discrepancies
        .into_iter()
        .min()
        .map_or(LogCanonicity::Infinite, |d| LogCanonicity::Finite(d + int(1))))
}

/// All discrepancies `> −1`.
pub fn is_log_terminal(x: &CStarSurface) -> Result<bool> {
    Ok(log_canonicity(x)?.exceeds(&Rational::zero()))
}

/// All discrepancies `≥ 0`.
pub fn is_canonical(x: &CStarSurface) -> Result<bool> {
    Ok(log_canonicity(x)? >= LogCanonicity::Finite(int(1)))
}

/// All discrepancies `> 0`; for surfaces this means smooth.
pub fn is_terminal(x: &CStarSurface) -> Result<bool> {
    Ok(log_canonicity(x)?.exceeds(&int(1)))
}

pub fn is_smooth(x: &CStarSurface) -> Result<bool> {
    for p in x.fixed_points() {
        if !p.is_smooth(x)? {
            return Ok(false);
        }
    }
    Ok(true)
}
