// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use echo_geom::Sphere;
use echo_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn cloud(n: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            )
        })
        .collect()
}

fn bench_minimal_enclosing(c: &mut Criterion) {
    let mut group = c.benchmark_group("enclosing_sphere");
    for &n in &[16usize, 256, 4_096, 65_536] {
        let points = cloud(n, 0x5eed);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| Sphere::minimal_enclosing(points).expect("non-empty cloud"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_minimal_enclosing);
criterion_main!(benches);
