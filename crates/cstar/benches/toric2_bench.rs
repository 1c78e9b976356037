//! Criterion benches for the 2D cone resolution.
//! Cones `cone((0,1), (d,−k))` with determinant d in {5, 50, 500, 5000}.
//! Results live under target/criterion.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cstar::toric2::{hilbert_basis, hirzebruch_jung, resolve_cone};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn coprime_k(d: i64, seed: u64) -> i64 {
    let mut rng = StdRng::seed_from_u64(seed);
    loop {
        let k = rng.gen_range(1..d);
        if num_integer::gcd(d, k) == 1 {
            return k;
        }
    }
}

fn bench_toric2(c: &mut Criterion) {
    let mut group = c.benchmark_group("toric2");
    for &d in &[5i64, 50, 500, 5000] {
        let k = coprime_k(d, 41);
        group.bench_with_input(BenchmarkId::new("hirzebruch_jung", d), &(d, k), |b, &(d, k)| {
            b.iter(|| hirzebruch_jung(d, k))
        });
        group.bench_with_input(BenchmarkId::new("hilbert_basis", d), &(d, k), |b, &(d, k)| {
            b.iter(|| hilbert_basis(d, k))
        });
        // Skewed generators force the normal-form transform.
        let v1 = Vector2::new(3, 7);
        let v2 = Vector2::new(3 * k - d * 2, 7 * k - d * 5);
        group.bench_with_input(BenchmarkId::new("resolve_cone", d), &(v1, v2), |b, &(v1, v2)| {
            b.iter(|| {
                let _res = resolve_cone(v1, v2);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_toric2);
criterion_main!(benches);
