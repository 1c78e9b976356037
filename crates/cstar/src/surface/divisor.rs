//! Invariant divisors as integer coefficient vectors over the prime divisors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{CStarSurface, End};
use crate::error::{CStarError, Result};

/// One invariant prime divisor: a block ray or an apex (parabolic fixed-point curve).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimeSlot {
    Ray { block: usize, ray: usize },
    Apex(End),
}

impl fmt::Display for PrimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimeSlot::Ray { block, ray } => write!(f, "D({block},{ray})"),
            PrimeSlot::Apex(End::Plus) => write!(f, "D+"),
            PrimeSlot::Apex(End::Minus) => write!(f, "D-"),
        }
    }
}

impl CStarSurface {
    /// All prime divisors in slot order: block rays, then plus apex, then minus apex.
    pub fn prime_slots(&self) -> Vec<PrimeSlot> {
        let mut out = Vec::with_capacity(self.nprime_divisors());
        for (block, b) in self.blocks().iter().enumerate() {
            out.extend((0..b.len()).map(|ray| PrimeSlot::Ray { block, ray }));
        }
        for end in [End::Plus, End::Minus] {
            if self.has_apex(end) {
                out.push(PrimeSlot::Apex(end));
            }
        }
        out
    }

    /// Position of `slot` in `prime_slots()`.
    pub fn slot_index(&self, slot: PrimeSlot) -> Result<usize> {
        match slot {
            PrimeSlot::Ray { block, ray } => {
                self.ray(block, ray)?;
                let before: usize = self.blocks()[..block].iter().map(Vec::len).sum();
                Ok(before + ray)
            }
            PrimeSlot::Apex(end) => {
                if !self.has_apex(end) {
                    return Err(CStarError::IndexError(format!(
                        "no {end} apex on a surface of case {}",
                        self.case()
                    )));
                }
                let offset = match end {
                    End::Plus => 0,
                    End::Minus => usize::from(self.has_apex(End::Plus)),
                };
                Ok(self.nrays() + offset)
            }
        }
    }
}

/// Integer combination of invariant prime divisors.
///
/// The shape (block sizes, apex slots) is that of the surface the divisor was
/// created for; arithmetic between different shapes fails with `ShapeMismatch`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Divisor {
    pub blocks: Vec<Vec<i64>>,
    pub plus: Option<i64>,
    pub minus: Option<i64>,
}

impl Divisor {
    pub fn zero(x: &CStarSurface) -> Self {
        Self {
            blocks: x.blocks().iter().map(|b| vec![0; b.len()]).collect(),
            plus: x.has_apex(End::Plus).then_some(0),
            minus: x.has_apex(End::Minus).then_some(0),
        }
    }

    /// The prime divisor at `slot`.
    pub fn prime(x: &CStarSurface, slot: PrimeSlot) -> Result<Self> {
        x.slot_index(slot)?;
        let mut div = Self::zero(x);
        *div.slot_mut(slot)? = 1;
        Ok(div)
    }

    /// Build from a flat coefficient vector in slot order.
    pub fn from_coefficients(x: &CStarSurface, coeffs: &[i64]) -> Result<Self> {
        if coeffs.len() != x.nprime_divisors() {
            return Err(CStarError::ShapeMismatch(format!(
                "{} coefficients for {} prime divisors",
                coeffs.len(),
                x.nprime_divisors()
            )));
        }
        let mut div = Self::zero(x);
        for (slot, &c) in x.prime_slots().into_iter().zip(coeffs) {
            *div.slot_mut(slot)? = c;
        }
        Ok(div)
    }

    /// Coefficients in slot order.
    pub fn coefficients(&self) -> Vec<i64> {
        self.blocks
            .iter()
            .flatten()
            .copied()
            .chain(self.plus)
            .chain(self.minus)
            .collect()
    }

    pub fn coefficient(&self, slot: PrimeSlot) -> Option<i64> {
        match slot {
            PrimeSlot::Ray { block, ray } => self.blocks.get(block)?.get(ray).copied(),
            PrimeSlot::Apex(End::Plus) => self.plus,
            PrimeSlot::Apex(End::Minus) => self.minus,
        }
    }

    fn slot_mut(&mut self, slot: PrimeSlot) -> Result<&mut i64> {
        let c = match slot {
            PrimeSlot::Ray { block, ray } => self.blocks.get_mut(block).and_then(|b| b.get_mut(ray)),
            PrimeSlot::Apex(End::Plus) => self.plus.as_mut(),
            PrimeSlot::Apex(End::Minus) => self.minus.as_mut(),
        };
        c.ok_or_else(|| CStarError::IndexError(format!("{slot} is not a slot of this divisor")))
    }

    /// Exactly one coefficient is 1, all others 0.
    pub fn is_prime(&self) -> bool {
        self.prime_slot().is_some()
    }

    /// The slot of a prime divisor, `None` if the divisor is not prime.
    pub fn prime_slot(&self) -> Option<PrimeSlot> {
        let mut found = None;
        for (block, b) in self.blocks.iter().enumerate() {
            for (ray, &c) in b.iter().enumerate() {
                match c {
                    0 => {}
                    1 if found.is_none() => found = Some(PrimeSlot::Ray { block, ray }),
                    _ => return None,
                }
            }
        }
        for (end, c) in [(End::Plus, self.plus), (End::Minus, self.minus)] {
            match c {
                None | Some(0) => {}
                Some(1) if found.is_none() => found = Some(PrimeSlot::Apex(end)),
                Some(_) => return None,
            }
        }
        found
    }

    /// Does this divisor have the shape of divisors on `x`?
    pub fn fits(&self, x: &CStarSurface) -> bool {
        self.blocks.len() == x.nblocks()
            && self.blocks.iter().zip(x.blocks()).all(|(a, b)| a.len() == b.len())
            && self.plus.is_some() == x.has_apex(End::Plus)
            && self.minus.is_some() == x.has_apex(End::Minus)
    }

    fn same_shape(&self, other: &Divisor) -> bool {
        self.blocks.len() == other.blocks.len()
            && self.blocks.iter().zip(&other.blocks).all(|(a, b)| a.len() == b.len())
            && self.plus.is_some() == other.plus.is_some()
            && self.minus.is_some() == other.minus.is_some()
    }

    pub fn try_add(&self, other: &Divisor) -> Result<Divisor> {
        if !self.same_shape(other) {
            return Err(CStarError::ShapeMismatch(
                "divisors live on surfaces with different block sizes or apex slots".into(),
            ));
        }
        let blocks = self
            .blocks
            .iter()
            .zip(&other.blocks)
            .map(|(a, b)| a.iter().zip(b).map(|(x, y)| x + y).collect())
            .collect();
        Ok(Divisor {
            blocks,
            plus: self.plus.zip(other.plus).map(|(a, b)| a + b),
            minus: self.minus.zip(other.minus).map(|(a, b)| a + b),
        })
    }

    pub fn scale(&self, k: i64) -> Divisor {
        Divisor {
            blocks: self
                .blocks
                .iter()
                .map(|b| b.iter().map(|c| k * c).collect())
                .collect(),
            plus: self.plus.map(|c| k * c),
            minus: self.minus.map(|c| k * c),
        }
    }

    /// Drop the slot of ray `ray` in block `block` (after contracting that ray).
    pub fn without_ray(&self, block: usize, ray: usize) -> Result<Divisor> {
        let mut out = self.clone();
        let b = out
            .blocks
            .get_mut(block)
            .filter(|b| ray < b.len())
            .ok_or_else(|| CStarError::IndexError(format!("slot ({block}, {ray})")))?;
        b.remove(ray);
        Ok(out)
    }

    /// Drop an apex slot (after contracting the parabolic curve at `end`).
    pub fn without_apex(&self, end: End) -> Result<Divisor> {
        let mut out = self.clone();
        let slot = match end {
            End::Plus => &mut out.plus,
            End::Minus => &mut out.minus,
        };
        if slot.take().is_none() {
            return Err(CStarError::IndexError(format!("no {end} apex slot")));
        }
        Ok(out)
    }

    /// Remove the slot of a contracted prime divisor.
    pub fn without(&self, slot: PrimeSlot) -> Result<Divisor> {
        match slot {
            PrimeSlot::Ray { block, ray } => self.without_ray(block, ray),
            PrimeSlot::Apex(end) => self.without_apex(end),
        }
    }
}
