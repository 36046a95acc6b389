//! Benchmarks for forest 2-NN queries.
//!
//! Measures the full search loop across examination budgets and forest
//! sizes, on a fixed seeded store so runs are comparable.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use thicket::{build_forest, two_nearest, DescriptorStore, KdTree, TreeParams};

const DIM: usize = 64;
const NUM_DESCRIPTORS: usize = 20_000;

fn seeded_store() -> Arc<DescriptorStore> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut store = DescriptorStore::with_capacity(DIM, NUM_DESCRIPTORS).unwrap();
    for _ in 0..NUM_DESCRIPTORS {
        let d: Vec<u8> = (0..DIM).map(|_| rng.gen()).collect();
        store.push(&d).unwrap();
    }
    Arc::new(store)
}

fn seeded_queries(n: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|_| (0..DIM).map(|_| rng.gen()).collect())
        .collect()
}

fn bench_budget_sweep(c: &mut Criterion) {
    let store = seeded_store();
    let forest = build_forest(store, 4, &TreeParams::default(), 13).unwrap();
    let queries = seeded_queries(64);

    let mut group = c.benchmark_group("budget_sweep");
    for budget in [128usize, 512, 2048, 8192].iter() {
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(budget), budget, |bencher, &budget| {
            bencher.iter(|| {
                for query in &queries {
                    black_box(two_nearest(&forest, query, budget));
                }
            });
        });
    }
    group.finish();
}

fn bench_forest_size(c: &mut Criterion) {
    let store = seeded_store();
    let forests: Vec<(usize, Vec<KdTree>)> = [1usize, 2, 4, 8]
        .iter()
        .map(|&n| {
            (
                n,
                build_forest(Arc::clone(&store), n, &TreeParams::default(), 17).unwrap(),
            )
        })
        .collect();
    let queries = seeded_queries(64);

    let mut group = c.benchmark_group("forest_size");
    for (num_trees, forest) in &forests {
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_trees),
            forest,
            |bencher, forest| {
                bencher.iter(|| {
                    for query in &queries {
                        black_box(two_nearest(forest, query, 1024));
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_budget_sweep, bench_forest_size);
criterion_main!(benches);
