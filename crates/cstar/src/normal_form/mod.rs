//! Normal forms of defining triples under admissible operations.
//!
//! Purpose
//! - Model the four invertible operations (row inversion, in-block ray
//!   permutation, block permutation, admissible row addition), compose them,
//!   and rewrite any sequence into kind order with merged runs.
//! - Bring a surface into a canonical representative so that equal normal
//!   forms decide isomorphism, and recover an explicit isomorphism.
//!
//! Normal form
//! 1. Orientation: `PE` keeps, `EP` inverts; `EE`/`PP` compare `m⁺` with
//!    `−m⁻`, ties broken by the sorted fractional-excess keys.
//! 2. Rays by decreasing slope. 3. Blocks by decreasing key.
//! 4. Row addition moving every first slope of blocks `1..R` into `[0, 1)`.
//!
//! Code cross-refs: `crate::surface::{CStarSurface, DefiningTriple}`.

mod compose;
mod form;
mod ops;

pub use compose::CompositeOperation;
pub use form::{are_isomorphic, compare_excess, isomorphism, normal_form, NormalForm};
pub use ops::{AdmissibleOperation, OperationKind};
