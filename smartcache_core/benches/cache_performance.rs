//! Cache Engine Benchmarks
//!
//! Lookup, insert and eviction cost of the synchronous engine at several
//! cache populations.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use smartcache_core::{CacheConfig, CacheEngine, CacheType};
use std::hint::black_box;

fn payload(i: usize) -> Value {
    json!({
        "id": format!("job_{i}"),
        "title": "Senior Software Developer",
        "skills": ["Rust", "TypeScript", "PostgreSQL"],
        "match": i % 100,
    })
}

fn populated_engine(entries: usize) -> CacheEngine {
    let config = CacheConfig::default().with_max_size_bytes(u64::MAX / 2);
    let mut engine = CacheEngine::new(&config).unwrap();
    for i in 0..entries {
        engine.set(&format!("k{i}"), payload(i), CacheType::Job);
    }
    engine
}

/// Benchmark hits and misses against a populated engine
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for &entries in &[100, 1_000, 10_000] {
        let mut engine = populated_engine(entries);
        group.bench_with_input(BenchmarkId::new("hit", entries), &entries, |b, &entries| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % entries;
                black_box(engine.get(&format!("k{i}"), CacheType::Job));
            });
        });
        group.bench_with_input(BenchmarkId::new("miss", entries), &entries, |b, _| {
            b.iter(|| black_box(engine.get("absent", CacheType::Job)));
        });
    }

    group.finish();
}

/// Benchmark overwriting existing keys
fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");

    for &entries in &[100, 1_000, 10_000] {
        let mut engine = populated_engine(entries);
        group.bench_with_input(
            BenchmarkId::new("overwrite", entries),
            &entries,
            |b, &entries| {
                let mut i = 0;
                b.iter(|| {
                    i = (i + 1) % entries;
                    black_box(engine.set(&format!("k{i}"), payload(i), CacheType::Job));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark inserts that force an eviction round at capacity
fn bench_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction");

    for &entries in &[100, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("set_at_capacity", entries),
            &entries,
            |b, &entries| {
                b.iter_batched(
                    || {
                        let engine = populated_engine(entries);
                        let size = engine.cache_size();
                        let config = CacheConfig::default().with_max_size_bytes(size);
                        let mut bounded = CacheEngine::new(&config).unwrap();
                        bounded.restore(engine.snapshot());
                        bounded
                    },
                    |mut engine| black_box(engine.set("overflow", payload(0), CacheType::Job)),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_get, bench_set, bench_eviction);

criterion_main!(benches);
