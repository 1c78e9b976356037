//! Sequences of admissible operations: application, inversion and the
//! kind-ordered normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ops::{is_permutation, AdmissibleOperation, OperationKind};
use crate::error::{CStarError, Result};
use crate::surface::{CStarSurface, DefiningTriple};

/// Operations applied left to right.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeOperation {
    ops: Vec<AdmissibleOperation>,
}

impl CompositeOperation {
    pub fn new(ops: Vec<AdmissibleOperation>) -> Self {
        Self { ops }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ops(&self) -> &[AdmissibleOperation] {
        &self.ops
    }

    /// True for the empty sequence (a normalized identity is always empty).
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Kinds in application order.
    pub fn kinds(&self) -> Vec<OperationKind> {
        self.ops.iter().map(AdmissibleOperation::kind).collect()
    }

    /// `self` followed by `op`.
    pub fn then(mut self, op: AdmissibleOperation) -> Self {
        self.ops.push(op);
        self
    }

    /// `self` followed by every operation of `other`.
    pub fn then_all(mut self, other: &CompositeOperation) -> Self {
        self.ops.extend(other.ops.iter().cloned());
        self
    }

    pub fn apply_triple(&self, t: &DefiningTriple) -> Result<DefiningTriple> {
        self.ops
            .iter()
            .try_fold(t.clone(), |acc, op| op.apply_triple(&acc))
    }

    /// Apply all operations to the raw triple, validating only the end result.
    pub fn apply(&self, x: &CStarSurface) -> Result<CStarSurface> {
        CStarSurface::try_from(self.apply_triple(&x.triple())?)
    }

    pub fn inverse(&self) -> Self {
        Self {
            ops: self.ops.iter().rev().map(AdmissibleOperation::inverse).collect(),
        }
    }

    /// Bubble every operation into kind order with the commutation rules, then
    /// merge runs of one kind and drop identities.
    pub fn normalize(&self) -> Result<Self> {
        let mut ops = self.ops.clone();
        let mut swapped = true;
        while swapped {
            swapped = false;
            for i in 1..ops.len() {
                if ops[i - 1].kind() > ops[i].kind() {
                    let (first, second) = swap(&ops[i - 1], &ops[i])?;
                    ops[i - 1] = first;
                    ops[i] = second;
                    swapped = true;
                }
            }
        }
        let mut merged: Vec<AdmissibleOperation> = Vec::with_capacity(ops.len());
        for op in ops {
            match merged.last_mut() {
                Some(last) if last.kind() == op.kind() => *last = merge(last, &op)?,
                _ => merged.push(op),
            }
        }
        merged.retain(|op| !op.is_identity());
        Ok(Self { ops: merged })
    }
}

fn mismatch(a: &AdmissibleOperation, b: &AdmissibleOperation) -> CStarError {
    CStarError::InvalidOperation(format!("{a} and {b} act on different block shapes"))
}

/// Rewrite `a; b` (with `kind(a) > kind(b)`) as `b'; a'`.
fn swap(
    a: &AdmissibleOperation,
    b: &AdmissibleOperation,
) -> Result<(AdmissibleOperation, AdmissibleOperation)> {
    use AdmissibleOperation::*;
    Ok(match (a, b) {
        (RayPermutation(_) | BlockPermutation(_), Inversion(_)) => (b.clone(), a.clone()),
        (RowAddition(f), Inversion(s)) => (
            Inversion(*s),
            RowAddition(f.iter().map(|x| s * x).collect()),
        ),
        (BlockPermutation(sigma), RayPermutation(pi)) => {
            if sigma.len() != pi.len() || !is_permutation(sigma) {
                return Err(mismatch(a, b));
            }
            let mut moved = vec![Vec::new(); pi.len()];
            for (k, &src) in sigma.iter().enumerate() {
                moved[src] = pi[k].clone();
            }
            (RayPermutation(moved), a.clone())
        }
        (RowAddition(_), RayPermutation(_)) => (b.clone(), a.clone()),
        (RowAddition(f), BlockPermutation(sigma)) => {
            if sigma.len() != f.len() || !is_permutation(sigma) {
                return Err(mismatch(a, b));
            }
            (b.clone(), RowAddition(sigma.iter().map(|&k| f[k]).collect()))
        }
        _ => {
            debug_assert!(a.kind() <= b.kind(), "missing commutation rule");
            (a.clone(), b.clone())
        }
    })
}

/// `a; b` of the same kind as one operation.
fn merge(a: &AdmissibleOperation, b: &AdmissibleOperation) -> Result<AdmissibleOperation> {
    use AdmissibleOperation::*;
    Ok(match (a, b) {
        (Inversion(s), Inversion(t)) => Inversion(s * t),
        (RayPermutation(p1), RayPermutation(p2)) => {
            if p1.len() != p2.len()
                || p1
                    .iter()
                    .zip(p2)
                    .any(|(x, y)| x.len() != y.len() || !is_permutation(y))
            {
                return Err(mismatch(a, b));
            }
            RayPermutation(
                p1.iter()
                    .zip(p2)
                    .map(|(x, y)| y.iter().map(|&j| x[j]).collect())
                    .collect(),
            )
        }
        (BlockPermutation(s1), BlockPermutation(s2)) => {
            if s1.len() != s2.len() || !is_permutation(s2) {
                return Err(mismatch(a, b));
            }
            BlockPermutation(s2.iter().map(|&k| s1[k]).collect())
        }
        (RowAddition(f), RowAddition(g)) => {
            if f.len() != g.len() {
                return Err(mismatch(a, b));
            }
            RowAddition(f.iter().zip(g).map(|(x, y)| x + y).collect())
        }
        _ => return Err(mismatch(a, b)),
    })
}

impl From<AdmissibleOperation> for CompositeOperation {
    fn from(op: AdmissibleOperation) -> Self {
        Self { ops: vec![op] }
    }
}

impl FromIterator<AdmissibleOperation> for CompositeOperation {
    fn from_iter<I: IntoIterator<Item = AdmissibleOperation>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for CompositeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("identity");
        }
        let parts: Vec<String> = self.ops.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}
