//! # Pool Performance Benchmark
//!
//! Spawn/kill churn on the projectile pool, the hottest recycling path.
//!
//! Run with: `cargo bench --package horde_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use horde_core::{Pool, Projectile};

/// Benchmark: Append into an empty pool.
fn bench_spawn_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_append");

    for count in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut pool: Pool<Projectile> = Pool::new();
                for _ in 0..count {
                    black_box(pool.spawn(Projectile::default()));
                }
                pool.alive_count()
            });
        });
    }

    group.finish();
}

/// Benchmark: Kill every other slot, then refill through the free list.
fn bench_recycle_cycle(c: &mut Criterion) {
    let mut pool: Pool<Projectile> = Pool::new();
    for _ in 0..100_000 {
        pool.spawn(Projectile::default());
    }

    c.bench_function("recycle_cycle_50K", |b| {
        b.iter(|| {
            for index in (0..100_000).step_by(2) {
                pool.kill(index);
            }
            for _ in 0..50_000 {
                black_box(pool.spawn(Projectile::default()));
            }
            pool.len()
        });
    });
}

/// Benchmark: Alive traversal over a half-dead pool.
fn bench_iter_alive(c: &mut Criterion) {
    let mut pool: Pool<Projectile> = Pool::new();
    for _ in 0..100_000 {
        pool.spawn(Projectile::default());
    }
    for index in (0..100_000).step_by(2) {
        pool.kill(index);
    }

    c.bench_function("iter_alive_100K_half_dead", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            for (_, projectile) in pool.iter_alive() {
                sum += projectile.damage;
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_spawn_append, bench_recycle_cycle, bench_iter_alive);
criterion_main!(benches);
