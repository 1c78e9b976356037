//! Curated internal API (UNSTABLE).
//!
//! Convenience surface for the CLI and experiments. Breaking changes are
//! allowed; prefer these re-exports over reaching into submodules.

// Model
pub use crate::surface::{
    CStarSurface, CStarSurfaceCase, DefiningTriple, Divisor, End, IntersectionMatrix, PrimeSlot,
    Ray,
};
// Toric building block
pub use crate::toric2::{
    cone_normal_form, discrepancy, hilbert_basis, hirzebruch_jung, resolve_cone, ConeNormalForm,
    ConeResolution,
};
// Resolution and singularity classes
pub use crate::resolution::{
    canonical_resolution, contract_minus_one_curves, is_canonical, is_log_terminal, is_smooth,
    is_terminal, log_canonicity, minimal_resolution, FixedPoint, LogCanonicity, Resolution,
};
// Normal forms
pub use crate::normal_form::{
    are_isomorphic, compare_excess, isomorphism, normal_form, AdmissibleOperation,
    CompositeOperation, NormalForm, OperationKind,
};
// Sampling and memoization
pub use crate::cache::{CacheStats, SurfaceCache};
pub use crate::sample::{
    draw_many, draw_surface, BlockCount, ReplayToken, SampleCfg as SurfaceSampleCfg,
};
