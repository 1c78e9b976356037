mod provenance;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cstar::api::{
    draw_many, isomorphism, minimal_resolution, BlockCount, CStarSurface, CStarSurfaceCase,
    CompositeOperation, SurfaceCache, SurfaceSampleCfg,
};
use provenance::{write_sidecar, Payload, Stamp};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Resolution and normal forms of rational C*-surfaces")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Canonical resolution report (JSON) for every surface in the input
    Resolve {
        /// One interchange line per surface; blank lines and `#` comments are skipped
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Minimal resolution report (JSON) for every surface in the input
    Minimal {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Normal-form line for every surface in the input
    NormalForm {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Decide whether two surfaces are isomorphic and print the isomorphism
    Isomorphic {
        #[arg(long)]
        left: String,
        #[arg(long)]
        right: String,
    },
    /// Random valid surfaces as interchange lines
    Sample {
        #[arg(long)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Fix the case (ee, pe, ep, pp); random by default
        #[arg(long)]
        case: Option<CStarSurfaceCase>,
        #[arg(long, default_value_t = 2)]
        min_blocks: usize,
        #[arg(long, default_value_t = 4)]
        max_blocks: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Resolve { input, out } => resolve(&input, out.as_deref()),
        Action::Minimal { input, out } => minimal(&input, out.as_deref()),
        Action::NormalForm { input, out } => normal_forms(&input, &out),
        Action::Isomorphic { left, right } => isomorphic(&left, &right),
        Action::Sample {
            count,
            seed,
            case,
            min_blocks,
            max_blocks,
            out,
        } => {
            let cfg = SurfaceSampleCfg {
                blocks: BlockCount::Uniform {
                    min: min_blocks,
                    max: max_blocks,
                },
                case,
                ..SurfaceSampleCfg::default()
            };
            sample(cfg, seed, count, out.as_deref())
        }
        Action::Report => report(),
    }
}

/// Surfaces of an interchange file with their 1-based line numbers.
fn read_surfaces(path: &Path) -> Result<Vec<(usize, CStarSurface)>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    text.lines()
        .enumerate()
        .filter(|(_, l)| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#')
        })
        .map(|(i, l)| -> Result<(usize, CStarSurface)> {
            let x = l
                .parse::<CStarSurface>()
                .with_context(|| format!("{}:{}", path.display(), i + 1))?;
            Ok((i + 1, x))
        })
        .collect()
}

/// Write `body` to `out` with a provenance sidecar, or print it.
fn emit(out: Option<&Path>, body: &str, payload: Payload) -> Result<()> {
    let Some(out) = out else {
        print!("{body}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, body).with_context(|| format!("writing {}", out.display()))?;
    let sidecar = write_sidecar(out, &payload)?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "wrote");
    Ok(())
}

fn json_body(rows: Vec<Value>) -> Result<String> {
    let mut body = serde_json::to_string_pretty(&Value::Array(rows))?;
    body.push('\n');
    Ok(body)
}

fn resolve(input: &Path, out: Option<&Path>) -> Result<()> {
    let surfaces = read_surfaces(input)?;
    tracing::info!(input = %input.display(), surfaces = surfaces.len(), "resolve");
    let mut cache = SurfaceCache::new();
    let mut rows = Vec::with_capacity(surfaces.len());
    for (line, x) in &surfaces {
        let res = cache
            .canonical_resolution(x)
            .with_context(|| format!("resolving line {line}"))?
            .clone();
        let lc = cache.log_canonicity(x)?;
        rows.push(report::canonical(*line, x, &res, &lc)?);
    }
    let payload = Payload::new("resolve", json!({ "surfaces": surfaces.len() })).with_input(input);
    emit(out, &json_body(rows)?, payload)
}

fn minimal(input: &Path, out: Option<&Path>) -> Result<()> {
    let surfaces = read_surfaces(input)?;
    tracing::info!(input = %input.display(), surfaces = surfaces.len(), "minimal");
    let rows = surfaces
        .iter()
        .map(|(line, x)| {
            let res = minimal_resolution(x).with_context(|| format!("resolving line {line}"))?;
            report::minimal(*line, x, &res)
        })
        .collect::<Result<Vec<_>>>()?;
    let payload = Payload::new("minimal", json!({ "surfaces": surfaces.len() })).with_input(input);
    emit(out, &json_body(rows)?, payload)
}

fn normal_forms(input: &Path, out: &Path) -> Result<()> {
    let surfaces = read_surfaces(input)?;
    tracing::info!(input = %input.display(), surfaces = surfaces.len(), "normal-form");
    let mut cache = SurfaceCache::new();
    let mut body = String::new();
    for (line, x) in &surfaces {
        let nf = cache
            .normal_form(x)
            .with_context(|| format!("normal form of line {line}"))?;
        tracing::debug!(line, operation = %nf.operation, "normal form");
        body.push_str(&nf.surface.to_line());
        body.push('\n');
    }
    let stats = cache.stats();
    let payload = Payload::new(
        "normal-form",
        json!({ "surfaces": surfaces.len(), "distinct": stats.misses }),
    )
    .with_input(input);
    emit(Some(out), &body, payload)
}

#[derive(Serialize)]
struct IsomorphismReport {
    left: String,
    right: String,
    isomorphic: bool,
    /// Human-readable form of `steps`.
    operation: Option<String>,
    steps: Option<CompositeOperation>,
}

fn isomorphic(left: &str, right: &str) -> Result<()> {
    let x: CStarSurface = left.parse().context("parsing --left")?;
    let y: CStarSurface = right.parse().context("parsing --right")?;
    let iso = isomorphism(&x, &y)?;
    let obj = IsomorphismReport {
        left: x.to_line(),
        right: y.to_line(),
        isomorphic: iso.is_some(),
        operation: iso.as_ref().map(ToString::to_string),
        steps: iso,
    };
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn sample(cfg: SurfaceSampleCfg, seed: u64, count: usize, out: Option<&Path>) -> Result<()> {
    let drawn = draw_many(cfg, seed, count);
    if drawn.len() < count {
        tracing::warn!(requested = count, drawn = drawn.len(), "sampler gave up early");
    }
    let body: String = drawn
        .iter()
        .map(|(_, x)| format!("{}\n", x.to_line()))
        .collect();
    let payload = Payload::new(
        "sample",
        json!({
            "seed": seed,
            "count": count,
            "config": serde_json::to_value(cfg)?,
        }),
    );
    emit(out, &body, payload)
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&Stamp::current())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_surfaces_skips_comments_and_reports_bad_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.txt");
        fs::write(
            &path,
            "# E6\nee;2,1,1;-3,-1,3,0,-3,-1,0,2,-2,-1,1,1\n\nPP;1,1;-1,1,0,0,0,0,1,-1\n",
        )
        .unwrap();
        let xs = read_surfaces(&path).unwrap();
        assert_eq!(xs.iter().map(|(l, _)| *l).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(xs[1].1.case(), CStarSurfaceCase::Pp);

        fs::write(&path, "ee;2,1,1;-3,-1,3,0\n").unwrap();
        let err = read_surfaces(&path).unwrap_err();
        assert!(format!("{err:#}").contains(":1"));
    }

    #[test]
    fn normal_form_writes_lines_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let out = dir.path().join("nf/out.txt");
        fs::write(
            &input,
            "ee;2,1,1;-3,-1,3,0,-3,-1,0,2,-2,-1,1,1\nee;2,1,1;-3,-1,3,0,-3,-1,0,2,-2,-1,1,1\n",
        )
        .unwrap();
        normal_forms(&input, &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["ee;2,1,1;-3,-1,2,0,-3,-1,0,3,-2,-1,1,1"; 2]);
        let sidecar = dir.path().join("nf/out.txt.provenance.json");
        let parsed: Value = serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(parsed["params"]["distinct"], 1);
    }

    #[test]
    fn sample_output_parses_back() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("sample.txt");
        sample(SurfaceSampleCfg::default(), 9, 5, Some(out.as_path())).unwrap();
        let xs = read_surfaces(&out).unwrap();
        assert_eq!(xs.len(), 5);
    }
}
