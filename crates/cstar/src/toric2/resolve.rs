//! Hirzebruch–Jung continued fractions, 2D Hilbert bases and discrepancies.

use nalgebra::Vector2;
use num_bigint::BigInt;
use num_traits::Zero;

use super::cone::{cone_normal_form, primitive};
use crate::arith::{int, Rational};
use crate::error::{CStarError, Result};

/// Exceptional rays of the minimal resolution of a 2D cone, with discrepancies.
///
/// Invariants:
/// - `rays.len() == discrepancies.len()`.
/// - `rays` run from the first cone generator towards the second; consecutive
///   rays (including the generators) span smooth cones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConeResolution {
    pub rays: Vec<Vector2<i64>>,
    pub discrepancies: Vec<Rational>,
}

impl ConeResolution {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }
}

/// Hirzebruch–Jung continued fraction `d/k = a_1 − 1/(a_2 − 1/(… − 1/a_m))`.
///
/// Recurrence: `a = (x + ((−x) mod y)) / y`, then `(x, y) ← (y, (−x) mod y)`,
/// from `(d, k)` until `y == 0`. Empty for `k == 0`.
pub fn hirzebruch_jung(d: i64, k: i64) -> Vec<i64> {
    let (mut x, mut y) = (d, k);
    let mut out = Vec::new();
    while y != 0 {
        let r = (-x).rem_euclid(y);
        out.push((x + r) / y);
        (x, y) = (y, r);
    }
    out
}

/// Hilbert basis elements of `cone((0,1), (d,−k))` strictly between the generators,
/// in normal-form coordinates.
pub fn hilbert_basis(d: i64, k: i64) -> Vec<Vector2<i64>> {
    let cf = hirzebruch_jung(d, k);
    let (mut x, mut y) = (0i64, 1i64);
    let (mut a, mut b) = (-1i64, 0i64);
    let mut out = Vec::with_capacity(cf.len());
    for &c in &cf {
        out.push(Vector2::new(y, -b));
        (x, y) = (y, c * y - x);
        (a, b) = (b, c * b - a);
    }
    out
}

/// Discrepancy of the ray through `w` with respect to `cone(v1, v2)`.
///
/// `v1` and `v2` must be the primitive generators of the cone's rays; scaling
/// either one moves the line below and changes the result.
/// The line `ℝ·w` meets the line through `v1, v2` in a point `p`; the result
/// is `‖w‖/‖p‖ − 1`, read off a coordinate where `w` is non-zero (intercept
/// theorem).
pub fn discrepancy(v1: Vector2<i64>, v2: Vector2<i64>, w: Vector2<i64>) -> Result<Rational> {
    let no_meet = || CStarError::NoUniqueIntersection { ray: (w.x, w.y) };
    // Solve λ·w − μ·(v2 − v1) = v1 by Cramer's rule.
    let e = v2 - v1;
    let det = e.x * w.y - w.x * e.y;
    if det == 0 {
        return Err(no_meet());
    }
    let lambda = Rational::new(BigInt::from(e.x * v1.y - v1.x * e.y), BigInt::from(det));
    if lambda.is_zero() {
        return Err(no_meet());
    }
    let p = (int(w.x) * &lambda, int(w.y) * &lambda);
    let ratio = if w.x != 0 {
        int(w.x) / p.0
    } else {
        int(w.y) / p.1
    };
    Ok(ratio - int(1))
}

/// Resolve `cone(v1, v2)`: the rays to insert and their discrepancies.
///
/// Both lists are empty iff the cone is already smooth. Fails with
/// `NoUniqueCone` for linearly dependent generators. Generators need not be
/// primitive; discrepancies are taken against the primitive ones.
pub fn resolve_cone(v1: Vector2<i64>, v2: Vector2<i64>) -> Result<ConeResolution> {
    let nf = cone_normal_form(v1, v2)?;
    let (u1, u2) = (primitive(v1), primitive(v2));
    let m_inv = nf.m_inv();
    let rays: Vec<Vector2<i64>> = hilbert_basis(nf.d, nf.k)
        .into_iter()
        .map(|p| m_inv * p)
        .collect();
    let discrepancies = rays
        .iter()
        .map(|&w| discrepancy(u1, u2, w))
        .collect::<Result<Vec<_>>>()?;
    Ok(ConeResolution {
        rays,
        discrepancies,
    })
}
