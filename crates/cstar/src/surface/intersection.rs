//! Rational intersection numbers of invariant prime divisors.
//!
//! With `gap(i, j) = 1/(m_ij − m_i,j+1)` and the boundary values
//! `𝓵⁺ = −1/m⁺` (elliptic plus) resp. `0` (parabolic plus),
//! `𝓵⁻ = 1/m⁻` (elliptic minus) resp. `0` (parabolic minus):
//! - `D_ij · D_i,j+1 = gap(i, j) / (l_ij l_i,j+1)`;
//! - `D_ij · D_i'j'` for `i ≠ i'`: `−𝓵⁺/(l l')` if both rays are first,
//!   plus `−𝓵⁻/(l l')` if both are last;
//! - `D_ij² = −(before + after)/l_ij²` where `before`/`after` are the gaps to
//!   the neighbouring rays or the boundary values at the block ends;
//! - `D⁺·D_i,first = 1/l`, `(D⁺)² = −m⁺`, `D⁻·D_i,last = 1/l`, `(D⁻)² = m⁻`.

use nalgebra::DMatrix;
use num_traits::Zero;

use super::divisor::{Divisor, PrimeSlot};
use super::types::{CStarSurface, End};
use crate::arith::{int, rat, Rational};
use crate::error::{CStarError, Result};

/// Symmetric matrix of intersection numbers, rows/columns in `prime_slots()` order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntersectionMatrix {
    slots: Vec<PrimeSlot>,
    matrix: DMatrix<Rational>,
}

impl IntersectionMatrix {
    #[inline]
    pub fn slots(&self) -> &[PrimeSlot] {
        &self.slots
    }

    #[inline]
    pub fn matrix(&self) -> &DMatrix<Rational> {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn index(&self, slot: PrimeSlot) -> Result<usize> {
        self.slots
            .iter()
            .position(|&s| s == slot)
            .ok_or_else(|| CStarError::IndexError(format!("{slot} is not a prime divisor here")))
    }

    /// Intersection number of two prime divisors.
    pub fn get(&self, a: PrimeSlot, b: PrimeSlot) -> Result<&Rational> {
        Ok(&self.matrix[(self.index(a)?, self.index(b)?)])
    }

    /// Self-intersection of a prime divisor.
    pub fn self_intersection(&self, slot: PrimeSlot) -> Result<&Rational> {
        self.get(slot, slot)
    }

    /// Bilinear extension to arbitrary invariant divisors of the right shape.
    pub fn intersect(&self, a: &Divisor, b: &Divisor) -> Result<Rational> {
        let (ca, cb) = (a.coefficients(), b.coefficients());
        if ca.len() != self.len() || cb.len() != self.len() {
            return Err(CStarError::ShapeMismatch(format!(
                "divisors with {} and {} coefficients against {} prime divisors",
                ca.len(),
                cb.len(),
                self.len()
            )));
        }
        Ok(self.bilinear(&ca, &cb))
    }

    fn bilinear(&self, ca: &[i64], cb: &[i64]) -> Rational {
        let mut acc = Rational::zero();
        for (i, &x) in ca.iter().enumerate() {
            if x == 0 {
                continue;
            }
            for (j, &y) in cb.iter().enumerate() {
                if y != 0 {
                    acc += &self.matrix[(i, j)] * int(x * y);
                }
            }
        }
        acc
    }

    /// All entries integral (true for a smooth surface).
    pub fn is_integral(&self) -> bool {
        self.matrix.iter().all(|q| q.is_integer())
    }
}

impl CStarSurface {
    /// `𝓵⁺` resp. `𝓵⁻`: the boundary term at `end`.
    fn boundary_term(&self, end: End) -> Rational {
        if self.has_apex(end) {
            return Rational::zero();
        }
        let m = self.slope_sum(end);
        match end {
            End::Plus => -m.recip(),
            End::Minus => m.recip(),
        }
    }

    /// Reciprocal slope gap between rays `j` and `j + 1` of block `i`.
    fn gap(&self, i: usize, j: usize) -> Rational {
        let b = &self.blocks()[i];
        (b[j].slope() - b[j + 1].slope()).recip()
    }

    /// The full intersection matrix of invariant prime divisors.
    pub fn intersection_matrix(&self) -> IntersectionMatrix {
        let slots = self.prime_slots();
        let (lp, lm) = (self.boundary_term(End::Plus), self.boundary_term(End::Minus));
        let matrix = DMatrix::from_fn(slots.len(), slots.len(), |a, b| {
            self.prime_intersection(slots[a], slots[b], &lp, &lm)
        });
        debug_assert!(matrix == matrix.transpose());
        IntersectionMatrix { slots, matrix }
    }

    fn prime_intersection(
        &self,
        a: PrimeSlot,
        b: PrimeSlot,
        lp: &Rational,
        lm: &Rational,
    ) -> Rational {
        use PrimeSlot::{Apex, Ray};
        match (a, b) {
            (Apex(e1), Apex(e2)) if e1 == e2 => match e1 {
                End::Plus => -self.slope_sum(End::Plus),
                End::Minus => self.slope_sum(End::Minus),
            },
            (Apex(_), Apex(_)) => Rational::zero(),
            (Apex(end), Ray { block, ray }) | (Ray { block, ray }, Apex(end)) => {
                if ray == self.extremal_index(block, end) {
                    rat(1, self.blocks()[block][ray].l)
                } else {
                    Rational::zero()
                }
            }
            (Ray { block: i, ray: j }, Ray { block: k, ray: q }) => {
                let bi = &self.blocks()[i];
                let (l1, l2) = (bi[j].l, self.blocks()[k][q].l);
                if i == k && j == q {
                    let before = if j == 0 { lp.clone() } else { self.gap(i, j - 1) };
                    let after = if j + 1 == bi.len() { lm.clone() } else { self.gap(i, j) };
                    -(before + after) / int(l1 * l1)
                } else if i == k {
                    if j.abs_diff(q) == 1 {
                        self.gap(i, j.min(q)) / int(l1 * l2)
                    } else {
                        Rational::zero()
                    }
                } else {
                    let mut acc = Rational::zero();
                    if j == 0 && q == 0 {
                        acc -= lp;
                    }
                    if j + 1 == bi.len() && q + 1 == self.blocks()[k].len() {
                        acc -= lm;
                    }
                    acc / int(l1 * l2)
                }
            }
        }
    }

    /// Intersection number of two invariant divisors on this surface.
    pub fn intersect(&self, a: &Divisor, b: &Divisor) -> Result<Rational> {
        for d in [a, b] {
            if !d.fits(self) {
                return Err(CStarError::ShapeMismatch(
                    "divisor was created for a different surface".into(),
                ));
            }
        }
        self.intersection_matrix().intersect(a, b)
    }

    /// Canonical divisor `K = −Σ D_ρ + (R − 2)·Σ_j l_0j D_0j`.
    pub fn canonical_divisor(&self) -> Divisor {
        let shift = self.nblocks() as i64 - 2;
        let mut k = Divisor::zero(self);
        for (i, block) in self.blocks().iter().enumerate() {
            for (j, ray) in block.iter().enumerate() {
                k.blocks[i][j] = if i == 0 { shift * ray.l - 1 } else { -1 };
            }
        }
        k.plus = k.plus.map(|_| -1);
        k.minus = k.minus.map(|_| -1);
        k
    }

    /// Anticanonical self-intersection `K_X²`.
    pub fn anticanonical_self_intersection(&self) -> Rational {
        let k = self.canonical_divisor().coefficients();
        self.intersection_matrix().bilinear(&k, &k)
    }
}
