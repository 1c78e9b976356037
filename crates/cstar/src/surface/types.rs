//! Defining triples: rays, case tags and the validated `CStarSurface` value.
//!
//! - `Ray`: primitive `(l, d)` with `l > 0`; slope `d/l`.
//! - `CStarSurfaceCase`: which ends carry an elliptic fixed point (`E`) or a
//!   parabolic fixed-point curve (`P`); first letter is the plus end.
//! - `DefiningTriple`: raw, unvalidated blocks + case (what admissible
//!   operations act on).
//! - `CStarSurface`: validated, immutable triple.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;
use num_integer::Integer;
use serde::{Deserialize, Serialize};

use crate::arith::{int, rat, Rational};
use crate::error::{CStarError, Result};

/// Primitive ray `(l, d)` of a block, living in the `(l, d)` plane of its arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ray {
    pub l: i64,
    pub d: i64,
}

impl Ray {
    #[inline]
    pub const fn new(l: i64, d: i64) -> Self {
        Self { l, d }
    }

    #[inline]
    pub fn slope(&self) -> Rational {
        rat(self.d, self.l)
    }

    #[inline]
    pub fn as_vector(&self) -> Vector2<i64> {
        Vector2::new(self.l, self.d)
    }

    #[inline]
    pub fn from_vector(v: Vector2<i64>) -> Self {
        Self { l: v.x, d: v.y }
    }

    /// Compare slopes `d/l` exactly (`l > 0` on both sides).
    #[inline]
    pub fn cmp_slope(&self, other: &Ray) -> Ordering {
        (self.d as i128 * other.l as i128).cmp(&(other.d as i128 * self.l as i128))
    }
}

/// The two ends of the C*-action: the source (`Plus`) and the sink (`Minus`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum End {
    Plus,
    Minus,
}

impl End {
    /// `+1` for plus, `−1` for minus: the `d`-coordinate of the apex ray.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            End::Plus => 1,
            End::Minus => -1,
        }
    }

    #[inline]
    pub fn opposite(self) -> End {
        match self {
            End::Plus => End::Minus,
            End::Minus => End::Plus,
        }
    }

    /// Apex direction `(0, ±1)` in the `(l, d)` plane.
    #[inline]
    pub fn apex(self) -> Vector2<i64> {
        Vector2::new(0, self.sign())
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            End::Plus => write!(f, "plus"),
            End::Minus => write!(f, "minus"),
        }
    }
}

/// Case of a C*-surface: `E` = elliptic fixed point, `P` = parabolic fixed-point curve.
/// The first letter refers to the plus end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CStarSurfaceCase {
    Ee,
    Pe,
    Ep,
    Pp,
}

impl CStarSurfaceCase {
    pub fn from_ends(plus_parabolic: bool, minus_parabolic: bool) -> Self {
        match (plus_parabolic, minus_parabolic) {
            (false, false) => Self::Ee,
            (true, false) => Self::Pe,
            (false, true) => Self::Ep,
            (true, true) => Self::Pp,
        }
    }

    #[inline]
    pub fn is_parabolic(self, end: End) -> bool {
        match end {
            End::Plus => matches!(self, Self::Pe | Self::Pp),
            End::Minus => matches!(self, Self::Ep | Self::Pp),
        }
    }

    #[inline]
    pub fn is_elliptic(self, end: End) -> bool {
        !self.is_parabolic(end)
    }

    /// Same case with `end` switched to parabolic (`EE→PE`, `EP→PP`, …).
    pub fn with_parabolic(self, end: End) -> Self {
        match end {
            End::Plus => Self::from_ends(true, self.is_parabolic(End::Minus)),
            End::Minus => Self::from_ends(self.is_parabolic(End::Plus), true),
        }
    }

    /// Same case with `end` switched to elliptic (inverse of `with_parabolic`).
    pub fn with_elliptic(self, end: End) -> Self {
        match end {
            End::Plus => Self::from_ends(false, self.is_parabolic(End::Minus)),
            End::Minus => Self::from_ends(self.is_parabolic(End::Plus), false),
        }
    }

    /// Swap the roles of plus and minus: `EE↔EE`, `PE↔EP`, `PP↔PP`.
    pub fn inverted(self) -> Self {
        Self::from_ends(self.is_parabolic(End::Minus), self.is_parabolic(End::Plus))
    }

    /// Number of apex rays (parabolic ends).
    #[inline]
    pub fn apex_count(self) -> usize {
        [End::Plus, End::Minus]
            .into_iter()
            .filter(|&e| self.is_parabolic(e))
            .count()
    }
}

impl fmt::Display for CStarSurfaceCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ee => "ee",
            Self::Pe => "pe",
            Self::Ep => "ep",
            Self::Pp => "pp",
        };
        f.write_str(s)
    }
}

impl FromStr for CStarSurfaceCase {
    type Err = CStarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ee" => Ok(Self::Ee),
            "pe" => Ok(Self::Pe),
            "ep" => Ok(Self::Ep),
            "pp" => Ok(Self::Pp),
            other => Err(CStarError::Parse(format!("unknown case '{other}'"))),
        }
    }
}

/// Unvalidated defining triple. Admissible operations act on this form; an
/// intermediate triple may violate slope order until a ray permutation restores it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefiningTriple {
    pub blocks: Vec<Vec<Ray>>,
    pub case: CStarSurfaceCase,
}

/// A C*-surface given by its defining triple.
///
/// Invariants (checked by `new`):
/// - at least two blocks, none empty;
/// - every ray has `l > 0` and `gcd(l, d) = 1`;
/// - rays of a block have strictly decreasing slope;
/// - an elliptic plus end has `m⁺ > 0`, an elliptic minus end has `m⁻ < 0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DefiningTriple", into = "DefiningTriple")]
pub struct CStarSurface {
    blocks: Vec<Vec<Ray>>,
    case: CStarSurfaceCase,
}

impl CStarSurface {
    /// Validate and build a surface from explicit block data.
    pub fn new(blocks: Vec<Vec<Ray>>, case: CStarSurfaceCase) -> Result<Self> {
        if blocks.len() < 2 {
            return Err(CStarError::TooFewBlocks(blocks.len()));
        }
        for (i, block) in blocks.iter().enumerate() {
            if block.is_empty() {
                return Err(CStarError::EmptyBlock { block: i });
            }
            for r in block {
                if r.l <= 0 {
                    return Err(CStarError::NonPositiveL {
                        block: i,
                        l: r.l,
                        d: r.d,
                    });
                }
                let gcd = r.l.gcd(&r.d);
                if gcd != 1 {
                    return Err(CStarError::NotCoprime {
                        block: i,
                        l: r.l,
                        d: r.d,
                        gcd,
                    });
                }
            }
            if let Some(j) = block
                .windows(2)
                .position(|w| w[0].cmp_slope(&w[1]) != Ordering::Greater)
            {
                return Err(CStarError::UnsortedBlock { block: i, ray: j + 1 });
            }
        }
        let x = Self { blocks, case };
        if case.is_elliptic(End::Plus) {
            let m = x.slope_sum(End::Plus);
            if m <= int(0) {
                return Err(CStarError::InvalidSlopeSum {
                    end: End::Plus,
                    slope_sum: m.to_string(),
                    requirement: "m⁺ > 0",
                });
            }
        }
        if case.is_elliptic(End::Minus) {
            let m = x.slope_sum(End::Minus);
            if m >= int(0) {
                return Err(CStarError::InvalidSlopeSum {
                    end: End::Minus,
                    slope_sum: m.to_string(),
                    requirement: "m⁻ < 0",
                });
            }
        }
        Ok(x)
    }

    /// Build from `l`/`d` tables of equal shape (one row per block).
    pub fn from_ld(l: &[Vec<i64>], d: &[Vec<i64>], case: CStarSurfaceCase) -> Result<Self> {
        if l.len() != d.len() {
            return Err(CStarError::BlockSizeMismatch {
                expected: l.len(),
                actual: d.len(),
            });
        }
        let mut blocks = Vec::with_capacity(l.len());
        for (ls, ds) in l.iter().zip(d) {
            if ls.len() != ds.len() {
                return Err(CStarError::BlockSizeMismatch {
                    expected: ls.len(),
                    actual: ds.len(),
                });
            }
            blocks.push(ls.iter().zip(ds).map(|(&l, &d)| Ray::new(l, d)).collect());
        }
        Self::new(blocks, case)
    }

    /// Like `new`, but sorts every block by decreasing slope first.
    pub fn from_unsorted(mut blocks: Vec<Vec<Ray>>, case: CStarSurfaceCase) -> Result<Self> {
        for block in &mut blocks {
            block.sort_by(|a, b| b.cmp_slope(a));
        }
        Self::new(blocks, case)
    }

    #[inline]
    pub fn blocks(&self) -> &[Vec<Ray>] {
        &self.blocks
    }

    #[inline]
    pub fn case(&self) -> CStarSurfaceCase {
        self.case
    }

    /// Number of blocks `R`.
    #[inline]
    pub fn nblocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_sizes(&self) -> Vec<usize> {
        self.blocks.iter().map(Vec::len).collect()
    }

    /// Number of block rays `N = Σ n_i` (apex rays excluded).
    pub fn nrays(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn has_apex(&self, end: End) -> bool {
        self.case.is_parabolic(end)
    }

    /// Number of invariant prime divisors: block rays plus apex rays.
    pub fn nprime_divisors(&self) -> usize {
        self.nrays() + self.case.apex_count()
    }

    pub fn ray(&self, block: usize, ray: usize) -> Result<Ray> {
        self.blocks
            .get(block)
            .and_then(|b| b.get(ray))
            .copied()
            .ok_or_else(|| {
                CStarError::IndexError(format!(
                    "ray ({block}, {ray}) of a surface with block sizes {:?}",
                    self.block_sizes()
                ))
            })
    }

    /// Extremal ray of block `i` at `end`: first (maximal slope) for plus, last for minus.
    #[inline]
    pub(crate) fn extremal_ray(&self, block: usize, end: End) -> Ray {
        let b = &self.blocks[block];
        match end {
            End::Plus => b[0],
            End::Minus => b[b.len() - 1],
        }
    }

    /// Index of the extremal ray of block `i` at `end`.
    #[inline]
    pub(crate) fn extremal_index(&self, block: usize, end: End) -> usize {
        match end {
            End::Plus => 0,
            End::Minus => self.blocks[block].len() - 1,
        }
    }

    /// Slopes `m_ij = d_ij / l_ij`, block by block.
    pub fn slopes(&self) -> Vec<Vec<Rational>> {
        self.blocks
            .iter()
            .map(|b| b.iter().map(Ray::slope).collect())
            .collect()
    }

    /// `m⁺ = Σ_i m_{i,first}` resp. `m⁻ = Σ_i m_{i,last}`.
    pub fn slope_sum(&self, end: End) -> Rational {
        (0..self.nblocks())
            .map(|i| self.extremal_ray(i, end).slope())
            .sum()
    }

    /// `ℓ^± = Σ_i 1/l_{i,extremal} − (R − 2)`.
    pub fn l_sum(&self, end: End) -> Rational {
        let recip: Rational = (0..self.nblocks())
            .map(|i| rat(1, self.extremal_ray(i, end).l))
            .sum();
        recip - int(self.nblocks() as i64 - 2)
    }

    /// Raw copy of the defining triple.
    pub fn triple(&self) -> DefiningTriple {
        DefiningTriple {
            blocks: self.blocks.clone(),
            case: self.case,
        }
    }
}

impl TryFrom<DefiningTriple> for CStarSurface {
    type Error = CStarError;

    fn try_from(t: DefiningTriple) -> Result<Self> {
        Self::new(t.blocks, t.case)
    }
}

impl From<CStarSurface> for DefiningTriple {
    fn from(x: CStarSurface) -> Self {
        DefiningTriple {
            blocks: x.blocks,
            case: x.case,
        }
    }
}
