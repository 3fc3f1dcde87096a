//! Benchmarks for insert, lookup, remove and the date-stepping range lookup.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rangemap_btree::BTree;

const KEYS: u64 = 10_000;

/// Deterministic key shuffle (multiplication by an odd constant mod 2^64).
fn scrambled(i: u64) -> u64 {
    i.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn build(order: usize) -> BTree<u64, u64> {
    let mut tree = BTree::with_order(order).unwrap();
    for i in 0..KEYS {
        tree.add(scrambled(i), i);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for order in [3usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter(|| black_box(build(order)));
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for order in [3usize, 16, 64] {
        let tree = build(order);
        group.bench_with_input(BenchmarkId::from_parameter(order), &tree, |b, tree| {
            b.iter(|| {
                for i in (0..KEYS).step_by(7) {
                    black_box(tree.lookup(&scrambled(i)));
                }
            });
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    for order in [3usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter_batched(
                || build(order),
                |mut tree| {
                    for i in 0..KEYS {
                        tree.remove(&scrambled(i));
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_lookup_range(c: &mut Criterion) {
    let mut tree = BTree::new();
    for month in 1..=12 {
        for day in (1..=28).step_by(2) {
            tree.add(format!("2024-{:02}-{:02}", month, day), month * 100 + day);
        }
    }

    c.bench_function("lookup_range/one_year", |b| {
        b.iter(|| black_box(tree.lookup_range("2024-01-01", "2024-12-31").unwrap().len()));
    });
}

criterion_group!(benches, bench_insert, bench_lookup, bench_remove, bench_lookup_range);
criterion_main!(benches);
