//! Resolution of two-dimensional affine toric singularities (exact arithmetic).
//!
//! Purpose
//! - Given two rays spanning a 2D cone, compute the cone's normal form
//!   `cone((0,1), (d,−k))`, the Hirzebruch–Jung continued fraction of `d/k`,
//!   the Hilbert basis rays that subdivide the cone into smooth cones, and the
//!   discrepancy of every inserted ray.
//! - Pure lattice arithmetic: no dependency on the surface model, so the
//!   fixed-point resolver can call it once per fixed point.
//!
//! Conventions
//! - Rays are `nalgebra::Vector2<i64>`; the unimodular change of basis is a
//!   `Matrix2<i64>` with determinant ±1.
//! - Inserted rays are returned in order from the first generator to the second.
//!
//! Code cross-refs: `crate::arith::{cls_div, ext_gcd, det2}`, `crate::resolution`.

mod cone;
mod resolve;

pub use cone::{cone_normal_form, ConeNormalForm};
pub use resolve::{
    discrepancy, hilbert_basis, hirzebruch_jung, resolve_cone, ConeResolution,
};

#[cfg(test)]
mod tests;
