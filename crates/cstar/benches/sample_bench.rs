//! Criterion microbenches for the replay-token surface sampler.
//! Results live under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use cstar::sample::{draw_surface, BlockCount, ReplayToken, SampleCfg};
use cstar::CStarSurfaceCase;

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");
    for (label, case) in [
        ("any", None),
        ("ee", Some(CStarSurfaceCase::Ee)),
        ("pp", Some(CStarSurfaceCase::Pp)),
    ] {
        let cfg = SampleCfg {
            blocks: BlockCount::Uniform { min: 2, max: 6 },
            case,
            ..SampleCfg::default()
        };
        group.bench_function(BenchmarkId::new("draw_surface", label), |b| {
            b.iter_batched(
                || ReplayToken::new(42, 0),
                |mut tok| {
                    tok.index = tok.index.wrapping_add(1);
                    let _ = draw_surface(cfg, tok);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sample);
criterion_main!(benches);
