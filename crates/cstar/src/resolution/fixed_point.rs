//! Fixed points of the C*-action and their local resolution.

use std::fmt;

use nalgebra::{DMatrix, Vector2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::canonical::Resolution;
use crate::arith::{int, integer_determinant, rat, Rational};
use crate::error::{CStarError, Result};
use crate::surface::{CStarSurface, Divisor, End, PrimeSlot, Ray};
use crate::toric2::resolve_cone;

/// A fixed point of the C*-action.
///
/// - `Elliptic(end)`: the isolated fixed point at an elliptic end.
/// - `Hyperbolic { block, ray }`: between rays `ray` and `ray + 1` of `block`.
/// - `Parabolic { end, block }`: where the extremal ray of `block` meets the
///   parabolic fixed-point curve at `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FixedPoint {
    Elliptic(End),
    Hyperbolic { block: usize, ray: usize },
    Parabolic { end: End, block: usize },
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedPoint::Elliptic(end) => write!(f, "elliptic {end}"),
            FixedPoint::Hyperbolic { block, ray } => write!(f, "hyperbolic ({block}, {ray})"),
            FixedPoint::Parabolic { end, block } => write!(f, "parabolic {end} ({block})"),
        }
    }
}

/// Rays and apex a single fixed point contributes to a resolution.
#[derive(Clone, Debug, Default)]
pub(crate) struct Insertion {
    /// `(block, ray, discrepancy)` in insertion order.
    pub rays: Vec<(usize, Ray, Rational)>,
    /// New apex with its discrepancy (elliptic points only).
    pub apex: Option<(End, Rational)>,
}

impl Insertion {
    fn is_empty(&self) -> bool {
        self.rays.is_empty() && self.apex.is_none()
    }
}

impl FixedPoint {
    pub fn elliptic(x: &CStarSurface, end: End) -> Result<Self> {
        let p = FixedPoint::Elliptic(end);
        p.check(x)?;
        Ok(p)
    }

    pub fn hyperbolic(x: &CStarSurface, block: usize, ray: usize) -> Result<Self> {
        let p = FixedPoint::Hyperbolic { block, ray };
        p.check(x)?;
        Ok(p)
    }

    pub fn parabolic(x: &CStarSurface, end: End, block: usize) -> Result<Self> {
        let p = FixedPoint::Parabolic { end, block };
        p.check(x)?;
        Ok(p)
    }

    /// Does this fixed point exist on `x`?
    pub fn check(&self, x: &CStarSurface) -> Result<()> {
        match *self {
            FixedPoint::Elliptic(end) if x.has_apex(end) => Err(CStarError::NoSuchFixedPoint(
                format!("{end} end of case {} is parabolic", x.case()),
            )),
            FixedPoint::Elliptic(_) => Ok(()),
            FixedPoint::Hyperbolic { block, ray } => {
                let n = x.blocks().get(block).map(Vec::len).ok_or_else(|| {
                    CStarError::IndexError(format!("block {block} of {}", x.nblocks()))
                })?;
                if ray + 1 >= n {
                    return Err(CStarError::IndexError(format!(
                        "hyperbolic point ({block}, {ray}) needs rays {ray} and {} in a block of {n}",
                        ray + 1
                    )));
                }
                Ok(())
            }
            FixedPoint::Parabolic { end, .. } if !x.has_apex(end) => {
                Err(CStarError::NoSuchFixedPoint(format!(
                    "{end} end of case {} is elliptic",
                    x.case()
                )))
            }
            FixedPoint::Parabolic { block, .. } => {
                if block >= x.nblocks() {
                    return Err(CStarError::IndexError(format!(
                        "block {block} of {}",
                        x.nblocks()
                    )));
                }
                Ok(())
            }
        }
    }

    /// Local toric chart: columns are the rays spanning the fixed point's cone
    /// (`2×2` in the `(l, d)` plane, or the `R×R` extremal P-matrix columns).
    pub fn toric_chart(&self, x: &CStarSurface) -> Result<DMatrix<i64>> {
        self.check(x)?;
        let pair = |u: Vector2<i64>, v: Vector2<i64>| {
            DMatrix::from_row_slice(2, 2, &[u.x, v.x, u.y, v.y])
        };
        Ok(match *self {
            FixedPoint::Elliptic(end) => x.extremal_columns(end),
            FixedPoint::Hyperbolic { block, ray } => {
                let b = &x.blocks()[block];
                pair(b[ray].as_vector(), b[ray + 1].as_vector())
            }
            FixedPoint::Parabolic { end, block } => {
                pair(end.apex(), x.extremal_ray(block, end).as_vector())
            }
        })
    }

    /// Order of the local class group: `|det|` of the (square) toric chart.
    pub fn local_class_group_order(&self, x: &CStarSurface) -> Result<u128> {
        let chart = self.toric_chart(x)?;
        let det = integer_determinant(&chart)
            .ok_or_else(|| CStarError::InvalidPMatrix("toric chart is not square".into()))?;
        Ok(det.unsigned_abs())
    }

    /// Is `x` smooth at this point?
    ///
    /// A cone point is smooth iff its chart is unimodular. An elliptic point is
    /// smooth iff it is factorial and at most two blocks have a non-trivial
    /// isotropy (`l ≥ 2`) at that end.
    pub fn is_smooth(&self, x: &CStarSurface) -> Result<bool> {
        let order = self.local_class_group_order(x)?;
        Ok(match *self {
            FixedPoint::Elliptic(end) => {
                let nontrivial = (0..x.nblocks())
                    .filter(|&i| x.extremal_ray(i, end).l >= 2)
                    .count();
                order == 1 && nontrivial <= 2
            }
            _ => order == 1,
        })
    }

    /// Rays (and apex) that resolve this fixed point, without assembling a surface.
    pub(crate) fn insertion(&self, x: &CStarSurface) -> Result<Insertion> {
        self.check(x)?;
        let mut out = Insertion::default();
        match *self {
            FixedPoint::Elliptic(end) => {
                if self.is_smooth(x)? {
                    return Ok(out);
                }
                let m = int(end.sign()) * x.slope_sum(end);
                let a = x.l_sum(end) / &m - int(1);
                for i in 0..x.nblocks() {
                    let v = x.extremal_ray(i, end);
                    let res = resolve_cone(end.apex(), v.as_vector())?;
                    for (w, disc) in res.rays.into_iter().zip(res.discrepancies) {
                        // w = s·apex + t·v; the apex is itself exceptional with discrepancy a.
                        let t = rat(w.x, v.l);
                        let s = int(end.sign()) * (int(w.y) - &t * int(v.d));
                        let corrected = disc + s * &a;
                        out.rays.push((i, Ray::from_vector(w), corrected));
                    }
                }
                out.apex = Some((end, a));
            }
            FixedPoint::Hyperbolic { block, ray } => {
                let b = &x.blocks()[block];
                let res = resolve_cone(b[ray].as_vector(), b[ray + 1].as_vector())?;
                out.rays.extend(
                    res.rays
                        .into_iter()
                        .zip(res.discrepancies)
                        .map(|(w, disc)| (block, Ray::from_vector(w), disc)),
                );
            }
            FixedPoint::Parabolic { end, block } => {
                let v = x.extremal_ray(block, end);
                let res = resolve_cone(end.apex(), v.as_vector())?;
                out.rays.extend(
                    res.rays
                        .into_iter()
                        .zip(res.discrepancies)
                        .map(|(w, disc)| (block, Ray::from_vector(w), disc)),
                );
            }
        }
        debug!(point = %self, rays = out.rays.len(), apex = out.apex.is_some(), "resolved fixed point");
        Ok(out)
    }

    /// Resolve only this fixed point.
    pub fn resolve(&self, x: &CStarSurface) -> Result<Resolution> {
        let ins = self.insertion(x)?;
        assemble(x, std::slice::from_ref(&ins))
    }
}

impl CStarSurface {
    /// All fixed points: elliptic plus, elliptic minus, hyperbolic in block/ray
    /// order, then parabolic plus and parabolic minus in block order.
    pub fn fixed_points(&self) -> Vec<FixedPoint> {
        let mut out = Vec::new();
        for end in [End::Plus, End::Minus] {
            if !self.has_apex(end) {
                out.push(FixedPoint::Elliptic(end));
            }
        }
        for (block, b) in self.blocks().iter().enumerate() {
            out.extend((0..b.len() - 1).map(|ray| FixedPoint::Hyperbolic { block, ray }));
        }
        for end in [End::Plus, End::Minus] {
            if self.has_apex(end) {
                out.extend((0..self.nblocks()).map(|block| FixedPoint::Parabolic { end, block }));
            }
        }
        out
    }
}

/// Insert all rays and apexes into `x`, re-sort every block and index the new
/// exceptional divisors against the result (in insertion order).
pub(crate) fn assemble(x: &CStarSurface, insertions: &[Insertion]) -> Result<Resolution> {
    let mut blocks = x.blocks().to_vec();
    let mut case = x.case();
    let mut discrepancies = Vec::new();
    let mut new_rays = Vec::new();
    let mut new_apexes = Vec::new();
    for ins in insertions.iter().filter(|ins| !ins.is_empty()) {
        for (block, ray, disc) in &ins.rays {
            blocks[*block].push(*ray);
            new_rays.push((*block, *ray));
            discrepancies.push(disc.clone());
        }
        if let Some((end, disc)) = &ins.apex {
            case = case.with_parabolic(*end);
            new_apexes.push((new_rays.len(), *end));
            discrepancies.push(disc.clone());
        }
    }
    let y = CStarSurface::from_unsorted(blocks, case)?;
    // Divisors follow insertion order, apexes directly after their point's rays.
    let mut exceptional = Vec::with_capacity(discrepancies.len());
    let mut apexes = new_apexes.into_iter().peekable();
    for (k, (block, ray)) in new_rays.iter().enumerate() {
        while let Some((_, end)) = apexes.next_if(|(at, _)| *at == k) {
            exceptional.push(Divisor::prime(&y, PrimeSlot::Apex(end))?);
        }
        let pos = y.blocks()[*block]
            .iter()
            .position(|r| r == ray)
            .ok_or_else(|| CStarError::IndexError(format!("inserted ray {ray:?} lost")))?;
        exceptional.push(Divisor::prime(&y, PrimeSlot::Ray { block: *block, ray: pos })?);
    }
    for (_, end) in apexes {
        exceptional.push(Divisor::prime(&y, PrimeSlot::Apex(end))?);
    }
    Ok(Resolution {
        surface: y,
        exceptional,
        discrepancies,
    })
}
