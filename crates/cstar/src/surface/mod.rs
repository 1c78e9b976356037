//! C*-surfaces given by defining triples.
//!
//! Purpose
//! - The validated value type `CStarSurface` (blocks of primitive rays `(l, d)`
//!   plus a case tag) and its derived views: slopes, slope sums `m^±`, the
//!   P-matrix and the one-line interchange format.
//! - Invariant divisors (`Divisor`, `PrimeSlot`) and their rational
//!   intersection theory (`IntersectionMatrix`, canonical divisor, `K²`).
//!
//! Conventions
//! - Block `i` lists its rays by strictly decreasing slope `d/l`; the first ray
//!   faces the plus end, the last ray faces the minus end.
//! - Prime divisors are ordered block by block, then plus apex, then minus apex.
//!
//! Code cross-refs: `crate::resolution`, `crate::normal_form`.

mod divisor;
mod intersection;
mod pmatrix;
mod types;

pub use divisor::{Divisor, PrimeSlot};
pub use intersection::IntersectionMatrix;
pub use types::{CStarSurface, CStarSurfaceCase, DefiningTriple, End, Ray};

#[cfg(test)]
mod tests;
