//! P-matrix view and the plain-text interchange format.
//!
//! With `R` blocks and `r = R − 1`, the P-matrix has `R` rows:
//! - block 0 ray `(l, d)` ↦ column `(−l, …, −l, d)`;
//! - block `i ≥ 1` ray `(l, d)` ↦ column `l·e_{i−1} + d·e_r`;
//! - plus apex ↦ `e_r`, minus apex ↦ `−e_r`.
//! Columns run block by block, then plus, then minus.
//!
//! Interchange line: `case;block-sizes;flattened P-matrix` (comma-separated,
//! row-major), e.g. `ee;2,1,1;-3,-1,3,0,-3,-1,0,2,-2,-1,1,1`.

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;

use super::types::{CStarSurface, CStarSurfaceCase, End, Ray};
use crate::error::{CStarError, Result};

impl CStarSurface {
    /// Column of the P-matrix for ray `(l, d)` in `block`.
    fn ray_column(&self, block: usize, ray: Ray) -> Vec<i64> {
        let r = self.nblocks() - 1;
        let mut col = vec![0; r + 1];
        if block == 0 {
            col[..r].fill(-ray.l);
        } else {
            col[block - 1] = ray.l;
        }
        col[r] = ray.d;
        col
    }

    /// The full ray matrix (`R` rows, `N + #apex` columns).
    pub fn p_matrix(&self) -> DMatrix<i64> {
        let rows = self.nblocks();
        let mut cols: Vec<Vec<i64>> = Vec::with_capacity(self.nprime_divisors());
        for (i, block) in self.blocks().iter().enumerate() {
            for &ray in block {
                cols.push(self.ray_column(i, ray));
            }
        }
        for end in [End::Plus, End::Minus] {
            if self.has_apex(end) {
                let mut col = vec![0; rows];
                col[rows - 1] = end.sign();
                cols.push(col);
            }
        }
        DMatrix::from_fn(rows, cols.len(), |i, j| cols[j][i])
    }

    /// P-matrix columns of the extremal rays at `end`, one per block (`R × R`).
    pub fn extremal_columns(&self, end: End) -> DMatrix<i64> {
        let rows = self.nblocks();
        let cols: Vec<Vec<i64>> = (0..rows)
            .map(|i| self.ray_column(i, self.extremal_ray(i, end)))
            .collect();
        DMatrix::from_fn(rows, rows, |i, j| cols[j][i])
    }

    /// Parse a ray matrix in P-matrix shape.
    ///
    /// Checks that every block column has the tropical pattern of its block
    /// with a shared positive `l`, and that apex columns match `case`.
    pub fn from_p_matrix(
        case: CStarSurfaceCase,
        block_sizes: &[usize],
        p: &DMatrix<i64>,
    ) -> Result<Self> {
        let nblocks = block_sizes.len();
        if nblocks < 2 {
            return Err(CStarError::TooFewBlocks(nblocks));
        }
        if p.nrows() != nblocks {
            return Err(CStarError::InvalidPMatrix(format!(
                "{} blocks need {} rows, got {}",
                nblocks,
                nblocks,
                p.nrows()
            )));
        }
        let n: usize = block_sizes.iter().sum();
        let expected = n + case.apex_count();
        if p.ncols() != expected {
            return Err(CStarError::BlockSizeMismatch {
                expected,
                actual: p.ncols(),
            });
        }
        let r = nblocks - 1;
        let mut blocks = Vec::with_capacity(nblocks);
        let mut c = 0usize;
        for (i, &size) in block_sizes.iter().enumerate() {
            let mut block = Vec::with_capacity(size);
            for _ in 0..size {
                let l = if i == 0 { -p[(0, c)] } else { p[(i - 1, c)] };
                if l <= 0 {
                    return Err(CStarError::InvalidPMatrix(format!(
                        "column {c} of block {i} must have a positive l-entry"
                    )));
                }
                let pattern_ok = (0..r).all(|row| {
                    let want = match i {
                        0 => -l,
                        _ if row == i - 1 => l,
                        _ => 0,
                    };
                    p[(row, c)] == want
                });
                if !pattern_ok {
                    return Err(CStarError::InvalidPMatrix(format!(
                        "column {c} does not lie in the arm of block {i}"
                    )));
                }
                block.push(Ray::new(l, p[(r, c)]));
                c += 1;
            }
            blocks.push(block);
        }
        for end in [End::Plus, End::Minus] {
            if case.is_parabolic(end) {
                let ok = (0..r).all(|row| p[(row, c)] == 0) && p[(r, c)] == end.sign();
                if !ok {
                    return Err(CStarError::InvalidPMatrix(format!(
                        "column {c} must be the {end} apex for case {case}"
                    )));
                }
                c += 1;
            }
        }
        Self::new(blocks, case)
    }

    /// Interchange line `case;block-sizes;flattened P-matrix`.
    pub fn to_line(&self) -> String {
        let p = self.p_matrix();
        let sizes: Vec<String> = self.block_sizes().iter().map(usize::to_string).collect();
        let entries: Vec<String> = (0..p.nrows())
            .flat_map(|i| (0..p.ncols()).map(move |j| (i, j)))
            .map(|(i, j)| p[(i, j)].to_string())
            .collect();
        format!("{};{};{}", self.case(), sizes.join(","), entries.join(","))
    }

    /// Parse one interchange line.
    pub fn from_line(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.trim().split(';').collect();
        if parts.len() != 3 {
            return Err(CStarError::Parse(format!(
                "expected 3 ';'-separated fields, got {}",
                parts.len()
            )));
        }
        let case: CStarSurfaceCase = parts[0].parse()?;
        let block_sizes = parse_list::<usize>(parts[1], "block size")?;
        let entries = parse_list::<i64>(parts[2], "matrix entry")?;
        let rows = block_sizes.len();
        if rows == 0 || entries.len() % rows != 0 {
            return Err(CStarError::Parse(format!(
                "{} matrix entries do not fill {} rows",
                entries.len(),
                rows
            )));
        }
        let p = DMatrix::from_row_slice(rows, entries.len() / rows, &entries);
        Self::from_p_matrix(case, &block_sizes, &p)
    }
}

fn parse_list<T: FromStr>(field: &str, what: &str) -> Result<Vec<T>> {
    field
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|_| CStarError::Parse(format!("invalid {what} '{}'", s.trim())))
        })
        .collect()
}

impl fmt::Display for CStarSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl FromStr for CStarSurface {
    type Err = CStarError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_line(s)
    }
}
