//! JSON reports for the `resolve` and `minimal` subcommands.
//!
//! Rationals are rendered as `"p/q"` strings (always with a denominator).

use anyhow::Result;
use cstar::api::{CStarSurface, FixedPoint, LogCanonicity, Resolution};
use cstar::Rational;
use serde_json::{json, Value};

pub fn rational(q: &Rational) -> Value {
    Value::String(format!("{}/{}", q.numer(), q.denom()))
}

fn log_canonicity(lc: &LogCanonicity) -> Value {
    match lc {
        LogCanonicity::Finite(q) => rational(q),
        LogCanonicity::Infinite => Value::String("inf".into()),
    }
}

fn fixed_point(x: &CStarSurface, p: &FixedPoint) -> Result<Value> {
    Ok(json!({
        "point": p.to_string(),
        "class_group_order": p.local_class_group_order(x)?,
        "smooth": p.is_smooth(x)?,
    }))
}

/// Exceptional divisors of `res` with discrepancies and self-intersections.
fn exceptional(res: &Resolution) -> Result<Value> {
    let slots = res.exceptional_slots()?;
    let selfs = res.self_intersections()?;
    let rows: Vec<Value> = slots
        .iter()
        .zip(&res.discrepancies)
        .zip(&selfs)
        .map(|((slot, a), e2)| {
            json!({
                "divisor": slot.to_string(),
                "discrepancy": rational(a),
                "self_intersection": rational(e2),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

/// Report for one surface and its canonical resolution.
pub fn canonical(
    line: usize,
    x: &CStarSurface,
    res: &Resolution,
    lc: &LogCanonicity,
) -> Result<Value> {
    let points = x
        .fixed_points()
        .iter()
        .map(|p| fixed_point(x, p))
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({
        "line": line,
        "surface": x.to_line(),
        "anticanonical_self_intersection": rational(&x.anticanonical_self_intersection()),
        "fixed_points": points,
        "resolved": res.surface.to_line(),
        "exceptional": exceptional(res)?,
        "log_canonicity": log_canonicity(lc),
    }))
}

/// Report for one surface and its minimal resolution.
pub fn minimal(line: usize, x: &CStarSurface, res: &Resolution) -> Result<Value> {
    Ok(json!({
        "line": line,
        "surface": x.to_line(),
        "resolved": res.surface.to_line(),
        "exceptional": exceptional(res)?,
    }))
}
