//! Minimal resolution: contract exceptional (−1)-curves until none are left.

use tracing::debug;

use super::canonical::{canonical_resolution, Resolution};
use crate::arith::int;
use crate::error::{CStarError, Result};
use crate::surface::{CStarSurface, PrimeSlot};

impl CStarSurface {
    /// Contract the invariant curve at `slot`: drop its ray, or drop the apex
    /// and turn that end elliptic.
    pub fn contract(&self, slot: PrimeSlot) -> Result<CStarSurface> {
        self.slot_index(slot)?;
        let mut t = self.triple();
        match slot {
            PrimeSlot::Ray { block, ray } => {
                if t.blocks[block].len() == 1 {
                    return Err(CStarError::EmptyBlock { block });
                }
                t.blocks[block].remove(ray);
            }
            PrimeSlot::Apex(end) => t.case = t.case.with_elliptic(end),
        }
        CStarSurface::try_from(t)
    }
}

impl Resolution {
    /// Contract the `k`-th exceptional divisor and re-index the others.
    pub fn contract(&self, k: usize) -> Result<Resolution> {
        let slot = self
            .exceptional
            .get(k)
            .and_then(|e| e.prime_slot())
            .ok_or_else(|| {
                CStarError::IndexError(format!("exceptional divisor {k} of {}", self.len()))
            })?;
        let surface = self.surface.contract(slot)?;
        let mut exceptional = Vec::with_capacity(self.len() - 1);
        let mut discrepancies = Vec::with_capacity(self.len() - 1);
        for (i, (e, disc)) in self.exceptional.iter().zip(&self.discrepancies).enumerate() {
            if i != k {
                exceptional.push(e.without(slot)?);
                discrepancies.push(disc.clone());
            }
        }
        Ok(Resolution {
            surface,
            exceptional,
            discrepancies,
        })
    }

    /// Index of the first exceptional divisor with self-intersection `−1`.
    pub fn first_minus_one_curve(&self) -> Result<Option<usize>> {
        let minus_one = int(-1);
        Ok(self.self_intersections()?.iter().position(|q| *q == minus_one))
    }
}

/// Repeatedly contract the first exceptional (−1)-curve. Every step removes a
/// ray or an apex, so the loop terminates.
pub fn contract_minus_one_curves(res: Resolution) -> Result<Resolution> {
    let mut res = res;
    while let Some(k) = res.first_minus_one_curve()? {
        debug!(
            slot = ?res.exceptional[k].prime_slot(),
            remaining = res.len() - 1,
            "contracting (-1)-curve"
        );
        res = res.contract(k)?;
    }
    Ok(res)
}

pub fn minimal_resolution(x: &CStarSurface) -> Result<Resolution> {
    contract_minus_one_curves(canonical_resolution(x)?)
}
