//! The four kinds of admissible operations on defining triples.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CStarError, Result};
use crate::surface::{CStarSurface, DefiningTriple};

/// Kinds in normal-form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Inversion,
    RayPermutation,
    BlockPermutation,
    RowAddition,
}

/// An invertible transformation of a defining triple that preserves the
/// isomorphism class of the surface.
///
/// - `Inversion(s)`, `s = ±1`: multiply every `d` by `s`; `−1` swaps the ends.
/// - `RayPermutation(π)`: in block `i`, new ray `j` is old ray `π[i][j]`.
/// - `BlockPermutation(σ)`: new block `k` is old block `σ[k]`.
/// - `RowAddition(f)`: `d_ij ← d_ij + f_i·l_ij`, one factor per block, `Σ f_i = 0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdmissibleOperation {
    Inversion(i64),
    RayPermutation(Vec<Vec<usize>>),
    BlockPermutation(Vec<usize>),
    RowAddition(Vec<i64>),
}

pub(super) fn is_permutation(p: &[usize]) -> bool {
    let mut seen = vec![false; p.len()];
    p.iter().all(|&i| i < p.len() && !std::mem::replace(&mut seen[i], true))
}

fn invert_permutation(p: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; p.len()];
    for (k, &i) in p.iter().enumerate() {
        inv[i] = k;
    }
    inv
}

impl AdmissibleOperation {
    pub fn inversion(factor: i64) -> Result<Self> {
        if factor.abs() != 1 {
            return Err(CStarError::InvalidOperation(format!(
                "inversion factor must be ±1, got {factor}"
            )));
        }
        Ok(Self::Inversion(factor))
    }

    pub fn ray_permutation(perms: Vec<Vec<usize>>) -> Result<Self> {
        if let Some(i) = perms.iter().position(|p| !is_permutation(p)) {
            return Err(CStarError::InvalidOperation(format!(
                "ray permutation of block {i} is not a permutation: {:?}",
                perms[i]
            )));
        }
        Ok(Self::RayPermutation(perms))
    }

    pub fn block_permutation(sigma: Vec<usize>) -> Result<Self> {
        if !is_permutation(&sigma) {
            return Err(CStarError::InvalidOperation(format!(
                "{sigma:?} is not a permutation of the blocks"
            )));
        }
        Ok(Self::BlockPermutation(sigma))
    }

    /// Row addition from all factors; they must sum to zero.
    pub fn row_addition(factors: Vec<i64>) -> Result<Self> {
        let sum: i64 = factors.iter().sum();
        if sum != 0 {
            return Err(CStarError::InvalidOperation(format!(
                "row addition factors {factors:?} sum to {sum}, not 0"
            )));
        }
        Ok(Self::RowAddition(factors))
    }

    /// Row addition from the factors of blocks `1..R`; block 0 gets minus their sum.
    pub fn row_addition_rest(rest: &[i64]) -> Self {
        let mut factors = Vec::with_capacity(rest.len() + 1);
        factors.push(-rest.iter().sum::<i64>());
        factors.extend_from_slice(rest);
        Self::RowAddition(factors)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Inversion(_) => OperationKind::Inversion,
            Self::RayPermutation(_) => OperationKind::RayPermutation,
            Self::BlockPermutation(_) => OperationKind::BlockPermutation,
            Self::RowAddition(_) => OperationKind::RowAddition,
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            Self::Inversion(s) => *s == 1,
            Self::RayPermutation(perms) => perms
                .iter()
                .all(|p| p.iter().enumerate().all(|(j, &k)| j == k)),
            Self::BlockPermutation(sigma) => sigma.iter().enumerate().all(|(j, &k)| j == k),
            Self::RowAddition(f) => f.iter().all(|&x| x == 0),
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            Self::Inversion(s) => Self::Inversion(*s),
            Self::RayPermutation(perms) => {
                Self::RayPermutation(perms.iter().map(|p| invert_permutation(p)).collect())
            }
            Self::BlockPermutation(sigma) => Self::BlockPermutation(invert_permutation(sigma)),
            Self::RowAddition(f) => Self::RowAddition(f.iter().map(|x| -x).collect()),
        }
    }

    fn shape_error(&self, t: &DefiningTriple) -> CStarError {
        let sizes: Vec<usize> = t.blocks.iter().map(Vec::len).collect();
        CStarError::InvalidOperation(format!("{self} does not fit block sizes {sizes:?}"))
    }

    /// Act on a raw triple. The result may violate slope order (e.g. after an
    /// inversion) until a ray permutation restores it.
    pub fn apply_triple(&self, t: &DefiningTriple) -> Result<DefiningTriple> {
        let mut out = t.clone();
        match self {
            Self::Inversion(s) => {
                for ray in out.blocks.iter_mut().flatten() {
                    ray.d *= s;
                }
                if *s == -1 {
                    out.case = out.case.inverted();
                }
            }
            Self::RayPermutation(perms) => {
                if perms.len() != t.blocks.len()
                    || perms
                        .iter()
                        .zip(&t.blocks)
                        .any(|(p, b)| p.len() != b.len() || !is_permutation(p))
                {
                    return Err(self.shape_error(t));
                }
                for ((dst, src), p) in out.blocks.iter_mut().zip(&t.blocks).zip(perms) {
                    *dst = p.iter().map(|&j| src[j]).collect();
                }
            }
            Self::BlockPermutation(sigma) => {
                if sigma.len() != t.blocks.len() || !is_permutation(sigma) {
                    return Err(self.shape_error(t));
                }
                out.blocks = sigma.iter().map(|&k| t.blocks[k].clone()).collect();
            }
            Self::RowAddition(f) => {
                if f.len() != t.blocks.len() {
                    return Err(self.shape_error(t));
                }
                for (block, &fi) in out.blocks.iter_mut().zip(f) {
                    for ray in block {
                        ray.d += fi * ray.l;
                    }
                }
            }
        }
        Ok(out)
    }

    /// Act on a surface and validate the result.
    pub fn apply(&self, x: &CStarSurface) -> Result<CStarSurface> {
        CStarSurface::try_from(self.apply_triple(&x.triple())?)
    }
}

impl fmt::Display for AdmissibleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inversion(s) => write!(f, "inversion({s})"),
            Self::RayPermutation(p) => write!(f, "ray-permutation({p:?})"),
            Self::BlockPermutation(s) => write!(f, "block-permutation({s:?})"),
            Self::RowAddition(x) => write!(f, "row-addition({x:?})"),
        }
    }
}
