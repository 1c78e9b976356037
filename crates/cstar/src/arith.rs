//! Exact integer and rational helpers shared by every module.
//!
//! - `Rational`: arbitrary-precision rational (`num_rational::BigRational`).
//! - `cls_div`: ceiling-style division `l = s·d − k` with `0 ≤ k < d`.
//! - `det2`, `integer_determinant`: exact lattice determinants.
//!
//! Nothing in this crate uses floating point; lattice coordinates are `i64`,
//! everything derived from quotients is a `Rational`.

use nalgebra::{DMatrix, Vector2};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;

/// Exact rational number used for slopes, intersection numbers and discrepancies.
pub type Rational = BigRational;

/// `n / d` as a reduced rational. `d` must be non-zero.
#[inline]
pub fn rat(n: i64, d: i64) -> Rational {
    Rational::new(BigInt::from(n), BigInt::from(d))
}

/// Integer `n` as a rational.
#[inline]
pub fn int(n: i64) -> Rational {
    Rational::from_integer(BigInt::from(n))
}

/// Division with non-positive remainder: returns `(s, k)` with `l = s·d − k` and `0 ≤ k < d`.
///
/// Requires `d > 0`. Example: `cls_div(7, 3) == (3, 2)` since `7 = 3·3 − 2`.
#[inline]
pub fn cls_div(l: i64, d: i64) -> (i64, i64) {
    debug_assert!(d > 0, "cls_div needs a positive divisor");
    let s = -((-l).div_floor(&d));
    (s, s * d - l)
}

/// Extended Euclid: `(g, x, y)` with `x·a + y·b = g` and `g ≥ 0`.
#[inline]
pub fn ext_gcd(a: i64, b: i64) -> (i64, i64, i64) {
    let e = a.extended_gcd(&b);
    if e.gcd < 0 {
        (-e.gcd, -e.x, -e.y)
    } else {
        (e.gcd, e.x, e.y)
    }
}

/// Determinant of the 2×2 matrix with columns `u`, `v`.
#[inline]
pub fn det2(u: Vector2<i64>, v: Vector2<i64>) -> i64 {
    u.x * v.y - u.y * v.x
}

/// Exact determinant of a square integer matrix (fraction-free Bareiss elimination).
///
/// Returns `None` for non-square input.
pub fn integer_determinant(m: &DMatrix<i64>) -> Option<i128> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }
    if n == 0 {
        return Some(1);
    }
    let mut a: Vec<Vec<i128>> = (0..n)
        .map(|i| (0..n).map(|j| m[(i, j)] as i128).collect())
        .collect();
    let mut sign = 1i128;
    let mut prev = 1i128;
    for k in 0..n - 1 {
        if a[k][k] == 0 {
            match (k + 1..n).find(|&r| a[r][k] != 0) {
                Some(r) => {
                    a.swap(k, r);
                    sign = -sign;
                }
                None => return Some(0),
            }
        }
        for i in k + 1..n {
            for j in k + 1..n {
                // Exact by Sylvester's identity.
                a[i][j] = (a[i][j] * a[k][k] - a[i][k] * a[k][j]) / prev;
            }
        }
        prev = a[k][k];
    }
    Some(sign * a[n - 1][n - 1])
}

/// Floor of a rational as a big integer.
#[inline]
pub fn floor(q: &Rational) -> BigInt {
    q.floor().to_integer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, vector};

    #[test]
    fn cls_div_examples() {
        assert_eq!(cls_div(7, 3), (3, 2));
        assert_eq!(cls_div(6, 3), (2, 0));
        assert_eq!(cls_div(-1, 3), (0, 1));
        assert_eq!(cls_div(0, 5), (0, 0));
        for l in -20..20 {
            for d in 1..7 {
                let (s, k) = cls_div(l, d);
                assert_eq!(l, s * d - k);
                assert!((0..d).contains(&k));
            }
        }
    }

    #[test]
    fn ext_gcd_bezout() {
        for (a, b) in [(3, 7), (-4, 6), (0, 5), (12, -18)] {
            let (g, x, y) = ext_gcd(a, b);
            assert!(g >= 0);
            assert_eq!(x * a + y * b, g);
            assert_eq!(g, a.gcd(&b));
        }
    }

    #[test]
    fn determinants() {
        assert_eq!(det2(vector![0, 1], vector![5, -2]), -5);
        let m = dmatrix![-3, 3, 0; -3, 0, 2; -2, 1, 1];
        assert_eq!(integer_determinant(&m), Some(3));
        let singular = dmatrix![1, 2; 2, 4];
        assert_eq!(integer_determinant(&singular), Some(0));
        let pivot = dmatrix![0, 1; 1, 0];
        assert_eq!(integer_determinant(&pivot), Some(-1));
        assert_eq!(integer_determinant(&dmatrix![1, 2, 3]), None);
    }

    #[test]
    fn rational_floor() {
        assert_eq!(floor(&rat(-2, 3)), BigInt::from(-1));
        assert_eq!(floor(&rat(7, 2)), BigInt::from(3));
        assert_eq!(floor(&int(4)), BigInt::from(4));
    }
}
