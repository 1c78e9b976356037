//! Normal form of a defining triple and isomorphism testing.

use std::cmp::Ordering;

use num_integer::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::compose::CompositeOperation;
use super::ops::AdmissibleOperation;
use crate::arith::{rat, Rational};
use crate::error::Result;
use crate::surface::{CStarSurface, CStarSurfaceCase, DefiningTriple, End, Ray};

/// The canonical representative of a surface and the operation reaching it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalForm {
    pub operation: CompositeOperation,
    pub surface: CStarSurface,
}

/// Order on fractional-excess keys: a longer key is greater; keys of equal
/// length compare entry by entry from the last to the first.
pub fn compare_excess(a: &[Rational], b: &[Rational]) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

/// `(m_ij − ⌊m_i,first⌋)_j` for a block, with rays taken by decreasing slope.
fn excess_key(block: &[Ray]) -> Vec<Rational> {
    let mut rays = block.to_vec();
    rays.sort_by(|a, b| b.cmp_slope(a));
    let shift = Integer::div_floor(&rays[0].d, &rays[0].l);
    rays.iter().map(|r| rat(r.d - shift * r.l, r.l)).collect()
}

/// Keys of all blocks, sorted descending.
fn sorted_keys(t: &DefiningTriple) -> Vec<Vec<Rational>> {
    let mut keys: Vec<Vec<Rational>> = t.blocks.iter().map(|b| excess_key(b)).collect();
    keys.sort_by(|a, b| compare_excess(b, a));
    keys
}

fn compare_key_lists(a: &[Vec<Rational>], b: &[Vec<Rational>]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| compare_excess(x, y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Does the normal form invert `x`?
fn needs_inversion(x: &CStarSurface) -> Result<bool> {
    Ok(match x.case() {
        CStarSurfaceCase::Pe => false,
        CStarSurfaceCase::Ep => true,
        CStarSurfaceCase::Ee | CStarSurfaceCase::Pp => {
            let plus = x.slope_sum(End::Plus);
            let minus = -x.slope_sum(End::Minus);
            match plus.cmp(&minus) {
                Ordering::Greater => false,
                Ordering::Less => true,
                Ordering::Equal => {
                    let t = x.triple();
                    let inverted = AdmissibleOperation::Inversion(-1).apply_triple(&t)?;
                    compare_key_lists(&sorted_keys(&t), &sorted_keys(&inverted)).is_lt()
                }
            }
        }
    })
}

fn sorting_permutation<T>(items: &[T], mut cmp: impl FnMut(&T, &T) -> Ordering) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..items.len()).collect();
    idx.sort_by(|&a, &b| cmp(&items[a], &items[b]));
    idx
}

/// Compute the normal form: orientation, ray order, block order, row addition.
pub fn normal_form(x: &CStarSurface) -> Result<NormalForm> {
    let mut op = CompositeOperation::identity();
    let mut t = x.triple();

    let inversion = AdmissibleOperation::Inversion(if needs_inversion(x)? { -1 } else { 1 });
    t = inversion.apply_triple(&t)?;
    op = op.then(inversion);

    let rays = AdmissibleOperation::RayPermutation(
        t.blocks
            .iter()
            .map(|b| sorting_permutation(b, |p, q| q.cmp_slope(p)))
            .collect(),
    );
    t = rays.apply_triple(&t)?;
    op = op.then(rays);

    let keys: Vec<Vec<Rational>> = t.blocks.iter().map(|b| excess_key(b)).collect();
    let blocks = AdmissibleOperation::BlockPermutation(sorting_permutation(&keys, |a, b| {
        compare_excess(b, a)
    }));
    t = blocks.apply_triple(&t)?;
    op = op.then(blocks);

    let floors: Vec<i64> = t.blocks[1..]
        .iter()
        .map(|b| Integer::div_floor(&b[0].d, &b[0].l))
        .collect();
    let rest: Vec<i64> = floors.iter().map(|f| -f).collect();
    op = op.then(AdmissibleOperation::row_addition_rest(&rest));

    let operation = op.normalize()?;
    let surface = operation.apply(x)?;
    debug!(input = %x, normal_form = %surface, "normal form");
    Ok(NormalForm { operation, surface })
}

pub fn are_isomorphic(x: &CStarSurface, y: &CStarSurface) -> Result<bool> {
    Ok(normal_form(x)?.surface == normal_form(y)?.surface)
}

/// An operation mapping `x` onto `y`, if the surfaces are isomorphic.
pub fn isomorphism(x: &CStarSurface, y: &CStarSurface) -> Result<Option<CompositeOperation>> {
    let (nx, ny) = (normal_form(x)?, normal_form(y)?);
    if nx.surface != ny.surface {
        return Ok(None);
    }
    nx.operation
        .then_all(&ny.operation.inverse())
        .normalize()
        .map(Some)
}
