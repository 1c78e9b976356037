//! Memoized surface attributes.
//!
//! Surfaces are immutable values, so results are keyed by the surface itself.
//! The cache is a plain owned map; callers that share it wrap it themselves.

use std::collections::hash_map::{Entry, HashMap};
use std::collections::HashSet;

use crate::error::Result;
use crate::normal_form::{normal_form, NormalForm};
use crate::resolution::{
    canonical_resolution, contract_minus_one_curves, minimal_resolution, LogCanonicity, Resolution,
};
use crate::surface::{CStarSurface, IntersectionMatrix};

/// Lookup counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
pub struct SurfaceCache {
    canonical: HashMap<CStarSurface, Resolution>,
    minimal: HashMap<CStarSurface, Resolution>,
    normal_forms: HashMap<CStarSurface, NormalForm>,
    intersections: HashMap<CStarSurface, IntersectionMatrix>,
    stats: CacheStats,
}

fn memo<'a, T>(
    map: &'a mut HashMap<CStarSurface, T>,
    stats: &mut CacheStats,
    x: &CStarSurface,
    compute: impl FnOnce() -> Result<T>,
) -> Result<&'a T> {
    match map.entry(x.clone()) {
        Entry::Occupied(e) => {
            stats.hits += 1;
            Ok(e.into_mut())
        }
        Entry::Vacant(e) => {
            stats.misses += 1;
            Ok(e.insert(compute()?))
        }
    }
}

impl SurfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of surfaces with at least one cached attribute.
    pub fn len(&self) -> usize {
        let keys: HashSet<&CStarSurface> = self
            .canonical
            .keys()
            .chain(self.minimal.keys())
            .chain(self.normal_forms.keys())
            .chain(self.intersections.keys())
            .collect();
        keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn canonical_resolution(&mut self, x: &CStarSurface) -> Result<&Resolution> {
        memo(&mut self.canonical, &mut self.stats, x, || canonical_resolution(x))
    }

    /// Minimal resolution, reusing the cached canonical resolution.
    pub fn minimal_resolution(&mut self, x: &CStarSurface) -> Result<&Resolution> {
        let fresh = if self.minimal.contains_key(x) {
            None
        } else {
            let canonical = self.canonical_resolution(x)?.clone();
            Some(contract_minus_one_curves(canonical)?)
        };
        memo(&mut self.minimal, &mut self.stats, x, || {
            fresh.map_or_else(|| minimal_resolution(x), Ok)
        })
    }

    pub fn normal_form(&mut self, x: &CStarSurface) -> Result<&NormalForm> {
        memo(&mut self.normal_forms, &mut self.stats, x, || normal_form(x))
    }

    pub fn intersection_matrix(&mut self, x: &CStarSurface) -> Result<&IntersectionMatrix> {
        memo(&mut self.intersections, &mut self.stats, x, || {
            Ok(x.intersection_matrix())
        })
    }

    pub fn log_canonicity(&mut self, x: &CStarSurface) -> Result<LogCanonicity> {
        let res = self.canonical_resolution(x)?;
        Ok(res
            .discrepancies
            .iter()
            .min()
            .map_or(LogCanonicity::Infinite, |d| {
                LogCanonicity::Finite(d + crate::arith::int(1))
            }))
    }

    pub fn are_isomorphic(&mut self, x: &CStarSurface, y: &CStarSurface) -> Result<bool> {
        let nx = self.normal_form(x)?.surface.clone();
        Ok(self.normal_form(y)?.surface == nx)
    }
}
