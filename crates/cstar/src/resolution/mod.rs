//! Resolution of singularities of C*-surfaces.
//!
//! Purpose
//! - Enumerate the fixed points of the C*-action (`FixedPoint`), compute
//!   their local toric charts and class group orders, and resolve each of
//!   them with the 2D primitive of `crate::toric2`.
//! - Assemble the canonical resolution of a surface and reduce it to the
//!   minimal one by contracting exceptional (−1)-curves.
//! - Read singularity invariants (log canonicity, log terminal, canonical,
//!   terminal, smooth) off the canonical resolution.
//!
//! Conventions
//! - An elliptic point inserts a new apex (the case flips to parabolic at that
//!   end) plus the Hirzebruch–Jung rays between the apex and every extremal
//!   ray. Smooth elliptic points are left alone.
//! - Discrepancies are relative to the input surface.
//!
//! Code cross-refs: `crate::surface::{CStarSurface, Divisor, IntersectionMatrix}`,
//! `crate::toric2::resolve_cone`.

mod canonical;
mod fixed_point;
mod minimal;

pub use canonical::{
    canonical_resolution, is_canonical, is_log_terminal, is_smooth, is_terminal, log_canonicity,
    LogCanonicity, Resolution,
};
pub use fixed_point::FixedPoint;
pub use minimal::{contract_minus_one_curves, minimal_resolution};
