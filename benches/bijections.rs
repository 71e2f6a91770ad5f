//! Benchmarks for the bijection pipelines.
//!
//! Measures the fast path against the checked path, and the cost of
//! snapshotting every stage into an in-memory archive.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrers::prelude::*;

/// `count` copies of each odd part `1, 3, ..., 2k - 1`.
fn odd_parts(k: usize, count: usize) -> Vec<usize> {
    (1..=k)
        .rev()
        .flat_map(|i| std::iter::repeat(2 * i - 1).take(count))
        .collect()
}

/// Staircase `(n, n - 1, ..., 1)`, which is self-conjugate.
fn staircase(n: usize) -> Vec<usize> {
    (1..=n).rev().collect()
}

fn bench_sylvester(c: &mut Criterion) {
    let mut group = c.benchmark_group("sylvester_forward");
    for k in [8usize, 32, 64] {
        let input = PointSet::from_parts(&odd_parts(k, 2));
        group.bench_with_input(BenchmarkId::new("fast", input.len()), &input, |b, ps| {
            b.iter(|| sylvester_forward(black_box(ps)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("checked", input.len()), &input, |b, ps| {
            b.iter(|| {
                Bijection::SylvesterForward
                    .apply_with(black_box(ps), BijectionOptions::checked(), None)
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_round_trips(c: &mut Criterion) {
    let odd = PointSet::from_parts(&odd_parts(32, 2));
    let distinct = sylvester_forward(&odd).unwrap();
    c.bench_function("sylvester_backward_2k_points", |b| {
        b.iter(|| sylvester_backward(black_box(&distinct)).unwrap());
    });

    let stairs = PointSet::from_parts(&staircase(60));
    c.bench_function("ag_round_trip_staircase_60", |b| {
        b.iter(|| {
            let there = ag_forward(black_box(&stairs)).unwrap();
            ag_backward(&there).unwrap()
        });
    });
}

/// Tracing overhead: every stage is fingerprinted and cloned into the archive.
fn bench_traced(c: &mut Criterion) {
    let input = PointSet::from_parts(&staircase(40));
    c.bench_function("scdo_forward_archived", |b| {
        b.iter(|| {
            let mut sink = ArchiveSink::new();
            Bijection::ScdoForward
                .apply_traced(black_box(&input), &mut sink)
                .unwrap();
            sink.into_archive()
        });
    });
}

fn bench_primitives(c: &mut Criterion) {
    let input = PointSet::from_parts(&staircase(200));
    let shear = SlMatrix::new(1, -1, 0, 1).unwrap();
    c.bench_function("shift_20k_points", |b| {
        b.iter(|| shift(black_box(&input), &shear));
    });
    c.bench_function("union_20k_points", |b| {
        let (top, bottom) = cut(&input, -1, 1, 0);
        b.iter(|| union(black_box(&top), black_box(&bottom)));
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10); // smaller sample for speed
    targets = bench_sylvester, bench_round_trips, bench_traced, bench_primitives
);
criterion_main!(benches);
