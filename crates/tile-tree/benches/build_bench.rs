//! Tile tree build benchmarks.
//!
//! Compares sequential and rayon-parallel builds over synthetic cities of
//! increasing size, and a clustered scene that forces deep refinement.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tile_tree::{FeatureSet, TileTreeBuilder, TilingOptions, WeightedBox};

/// Uniformly scattered building footprints over a square of `size` units.
fn uniform_city(count: usize, size: f64, seed: u64) -> FeatureSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = (0..count).map(|i| {
        let x = rng.random_range(0.0..size);
        let y = rng.random_range(0.0..size);
        let w = rng.random_range(4.0..40.0);
        let d = rng.random_range(4.0..40.0);
        let h = rng.random_range(3.0..80.0);
        WeightedBox::new(format!("b{i}"), [x, y, 0.0], [x + w, y + d, h])
    });
    FeatureSet::from_weighted(records).unwrap()
}

/// Most footprints packed into a small downtown area.
fn clustered_city(count: usize, size: f64, seed: u64) -> FeatureSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = (0..count).map(|i| {
        let spread = if i % 5 == 0 { size } else { size * 0.02 };
        let x = size * 0.5 + rng.random_range(-spread..spread) * 0.5;
        let y = size * 0.5 + rng.random_range(-spread..spread) * 0.5;
        WeightedBox::new(format!("c{i}"), [x, y, 0.0], [x + 5.0, y + 5.0, 20.0])
    });
    FeatureSet::from_weighted(records).unwrap()
}

fn bench_uniform(c: &mut Criterion) {
    let mut group = c.benchmark_group("uniform_city");
    for count in [1_000, 10_000, 100_000] {
        let set = uniform_city(count, 20_000.0, 42);
        for parallel in [false, true] {
            let builder = TileTreeBuilder::new(
                TilingOptions::default()
                    .with_capacity(50)
                    .with_max_tile_size(2000.0)
                    .with_parallel(parallel),
            );
            let name = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(name, count), &set, |b, set| {
                b.iter(|| black_box(builder.build_set(set).unwrap()))
            });
        }
    }
    group.finish();
}

fn bench_clustered(c: &mut Criterion) {
    let set = clustered_city(50_000, 20_000.0, 7);
    let mut group = c.benchmark_group("clustered_city");
    for parallel in [false, true] {
        let builder = TileTreeBuilder::new(
            TilingOptions::default()
                .with_capacity(20)
                .with_max_tile_size(4000.0)
                .with_parallel(parallel),
        );
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| b.iter(|| black_box(builder.build_set(&set).unwrap())));
    }
    group.finish();
}

criterion_group!(benches, bench_uniform, bench_clustered);
criterion_main!(benches);
