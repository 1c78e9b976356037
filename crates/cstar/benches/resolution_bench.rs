//! Criterion benches for canonical and minimal resolution.
//! Surfaces come from the replay-token sampler with 2, 4 and 8 blocks.
//! Results live under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use cstar::resolution::{canonical_resolution, log_canonicity, minimal_resolution};
use cstar::sample::{draw_many, BlockCount, SampleCfg};
use cstar::CStarSurface;

fn surfaces(nblocks: usize, seed: u64) -> Vec<CStarSurface> {
    let cfg = SampleCfg {
        blocks: BlockCount::Fixed(nblocks),
        max_rays_per_block: 3,
        max_l: 7,
        max_abs_d: 11,
        ..SampleCfg::default()
    };
    draw_many(cfg, seed, 16).into_iter().map(|(_, x)| x).collect()
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    for &n in &[2usize, 4, 8] {
        let xs = surfaces(n, 51);
        group.bench_with_input(BenchmarkId::new("canonical", n), &xs, |b, xs| {
            b.iter(|| {
                for x in xs {
                    let _res = canonical_resolution(x);
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("minimal", n), &xs, |b, xs| {
            b.iter(|| {
                for x in xs {
                    let _res = minimal_resolution(x);
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("log_canonicity", n), &xs, |b, xs| {
            b.iter(|| {
                for x in xs {
                    let _lc = log_canonicity(x);
                }
            })
        });
        group.bench_function(BenchmarkId::new("intersection_matrix", n), |b| {
            b.iter_batched(
                || xs[0].clone(),
                |x| {
                    let _m = x.intersection_matrix();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
