//! Du Val walk-through on the E6 surface.
//!
//! Purpose
//! - Show the end-to-end pipeline on a small, hand-checkable input: fixed
//!   points and their local class groups, the canonical and minimal
//!   resolution, the log canonicity, and the normal form.
//! - The surface has one E6 singularity at the plus elliptic point, so the
//!   resolution has six (−2)-curves, all discrepancies zero, and K² = 3.
//!
//! Run: `cargo run -p cstar --example du_val`

use std::time::Instant;

use cstar::prelude::*;

fn main() -> Result<()> {
    let x = CStarSurface::from_ld(
        &[vec![3, 1], vec![3], vec![2]],
        &[vec![-2, -1], vec![1], vec![1]],
        CStarSurfaceCase::Ee,
    )?;
    println!("surface={x}");
    println!("K^2={}", x.anticanonical_self_intersection());

    for p in x.fixed_points() {
        println!(
            "fixed_point={p} class_group_order={} smooth={}",
            p.local_class_group_order(&x)?,
            p.is_smooth(&x)?
        );
    }

    let start = Instant::now();
    let res = canonical_resolution(&x)?;
    let elapsed = start.elapsed().as_secs_f64() * 1e3;
    let selfs = res.self_intersections()?;
    for ((slot, a), e2) in res.exceptional_slots()?.iter().zip(&res.discrepancies).zip(&selfs) {
        println!("exceptional={slot} discrepancy={a} self_intersection={e2}");
    }
    println!("resolved={}", res.surface);
    println!("resolution_time_ms={elapsed:.3}");

    let min = minimal_resolution(&x)?;
    println!("minimal_exceptional={} (canonical {})", min.len(), res.len());
    println!("log_canonicity={}", log_canonicity(&x)?);

    let nf = normal_form(&x)?;
    println!("normal_form={} via {}", nf.surface, nf.operation);
    Ok(())
}
