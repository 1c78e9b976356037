//! Resolution of singularities and normal forms of rational C*-surfaces.
//!
//! A surface is encoded by its defining triple: blocks of rays `(l, d)` over
//! the points of the source curve plus a case tag saying which ends are
//! elliptic fixed points. All arithmetic is exact (`i64` lattice data,
//! `BigRational` for everything derived).
//!
//! Layout
//! - `surface`: the model, P-matrix interchange, divisors, intersection numbers.
//! - `toric2`: cones in Z² and their minimal resolution.
//! - `resolution`: fixed points, canonical and minimal resolution, discrepancies.
//! - `normal_form`: admissible operations, normal form, isomorphy.
//! - `sample`: reproducible random surfaces for tests and benches.
//! - `cache`: memoized attributes keyed by surface.
//!
//! API Policy
//! - Project-internal; `api` is the curated surface and may break freely.

pub mod api;
pub mod arith;
pub mod cache;
pub mod error;
pub mod normal_form;
pub mod resolution;
pub mod sample;
pub mod surface;
pub mod toric2;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use arith::Rational;
pub use error::{CStarError, Result};
pub use surface::{CStarSurface, CStarSurfaceCase, DefiningTriple, End, Ray};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::arith::{int, rat, Rational};
    pub use crate::cache::SurfaceCache;
    pub use crate::error::{CStarError, Result};
    pub use crate::normal_form::{
        are_isomorphic, isomorphism, normal_form, AdmissibleOperation, CompositeOperation,
        NormalForm,
    };
    pub use crate::resolution::{
        canonical_resolution, log_canonicity, minimal_resolution, FixedPoint, LogCanonicity,
        Resolution,
    };
    pub use crate::sample::{draw_many, draw_surface, BlockCount, ReplayToken, SampleCfg};
    pub use crate::surface::{
        CStarSurface, CStarSurfaceCase, DefiningTriple, Divisor, End, IntersectionMatrix,
        PrimeSlot, Ray,
    };
}
