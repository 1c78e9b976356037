//! Normal form of a 2D cone under unimodular transformations.

use nalgebra::{Matrix2, Vector2};
use num_integer::Integer;

use crate::arith::{cls_div, det2, ext_gcd};
use crate::error::{CStarError, Result};

/// `M·v1 = (0, 1)` and `M·v2 = (d, −k)` with `M` unimodular, `d > 0`, `0 ≤ k < d`.
///
/// `d` is the index of the cone (order of its local class group); the cone is
/// smooth iff `d == 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConeNormalForm {
    pub m: Matrix2<i64>,
    pub d: i64,
    pub k: i64,
}

impl ConeNormalForm {
    /// `det(M)`, always ±1.
    #[inline]
    pub fn det(&self) -> i64 {
        self.m[(0, 0)] * self.m[(1, 1)] - self.m[(0, 1)] * self.m[(1, 0)]
    }

    /// Exact inverse of the unimodular matrix `M`.
    pub fn m_inv(&self) -> Matrix2<i64> {
        let s = self.det();
        Matrix2::new(
            s * self.m[(1, 1)],
            -s * self.m[(0, 1)],
            -s * self.m[(1, 0)],
            s * self.m[(0, 0)],
        )
    }

    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.d == 1
    }
}

/// Primitive generator on the ray through `v` (caller guarantees `v != 0`).
pub(super) fn primitive(v: Vector2<i64>) -> Vector2<i64> {
    let g = v.x.gcd(&v.y);
    if g > 1 {
        Vector2::new(v.x / g, v.y / g)
    } else {
        v
    }
}

/// Compute the normal form of `cone(v1, v2)`.
///
/// Generators need not be primitive; only the rays they span matter here.
/// Fails with `NoUniqueCone` if `v1`, `v2` are linearly dependent.
pub fn cone_normal_form(v1: Vector2<i64>, v2: Vector2<i64>) -> Result<ConeNormalForm> {
    let det = det2(v1, v2);
    if det == 0 {
        return Err(CStarError::NoUniqueCone {
            v1: (v1.x, v1.y),
            v2: (v2.x, v2.y),
        });
    }
    let (u1, u2) = (primitive(v1), primitive(v2));
    let d = det2(u1, u2).abs();
    // First row kills u1; its sign makes the first coordinate of M·u2 positive.
    let sigma = -det.signum();
    let row0 = Vector2::new(sigma * u1.y, -sigma * u1.x);
    // Bezout: a·x1 + b·y1 = 1 sends u1 to (0, 1).
    let (_, a, b) = ext_gcd(u1.x, u1.y);
    let c = a * u2.x + b * u2.y;
    // Shear the second row by multiples of the first so that M·u2 = (d, -k).
    let (s, k) = cls_div(c, d);
    let row1 = Vector2::new(a, b) - row0 * s;
    let m = Matrix2::new(row0.x, row0.y, row1.x, row1.y);
    debug_assert_eq!(m * u1, Vector2::new(0, 1));
    debug_assert_eq!(m * u2, Vector2::new(d, -k));
    Ok(ConeNormalForm { m, d, k })
}
