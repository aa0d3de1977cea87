//! Criterion benchmarks for mnemo: key derivation, cache hits, and pass-through calls.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mnemo_cache::{memoize, memoize_with, CacheKey, KeyResolver, MemoConfig};
use mnemo_core::canonical_key;

fn bench_key_derivation(c: &mut Criterion) {
    let mut g = c.benchmark_group("key_derivation");
    g.throughput(Throughput::Elements(1));
    g.bench_function("canonical_string", |b| {
        b.iter(|| black_box(canonical_key(&"c544d3ae-a72d-4755-8ce5-d25db415b776")).unwrap());
    });
    g.bench_function("canonical_vec", |b| {
        let ids: Vec<u64> = (0..32).collect();
        b.iter(|| black_box(canonical_key(&ids)).unwrap());
    });
    g.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let memo = memoize(|(n,): (u64,)| n.wrapping_mul(2_654_435_761), 3_600_000);
    memo.call((42,));

    let mut g = c.benchmark_group("cache_hit");
    g.throughput(Throughput::Elements(1));
    g.bench_function("default_key", |b| {
        b.iter(|| black_box(memo.call((42,))));
    });
    g.finish();
}

fn bench_cache_hit_with_resolver(c: &mut Criterion) {
    let memo = memoize_with(
        |(key, _n): (String, u64)| key.len(),
        KeyResolver::exact(|(key, _): &(String, u64)| CacheKey::new(key.clone())),
        MemoConfig::with_ttl(3_600_000),
    );
    memo.call(("warm".to_string(), 1));

    let mut g = c.benchmark_group("cache_hit_resolver");
    g.throughput(Throughput::Elements(1));
    g.bench_function("resolver_key", |b| {
        b.iter(|| black_box(memo.call(("warm".to_string(), 1))));
    });
    g.finish();
}

fn bench_pass_through(c: &mut Criterion) {
    // TTL 0 disables caching; measures pure wrapper overhead
    let memo = memoize(|(n,): (u64,)| n.wrapping_mul(2_654_435_761), 0);

    let mut g = c.benchmark_group("pass_through");
    g.throughput(Throughput::Elements(1));
    g.bench_function("ttl_zero", |b| {
        b.iter(|| black_box(memo.call((42,))));
    });
    g.finish();
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_cache_hit,
    bench_cache_hit_with_resolver,
    bench_pass_through
);
criterion_main!(benches);
