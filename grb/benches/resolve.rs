//! Benchmarks for operator resolution, index marshaling and cursor walks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grb::{ops, to_index_list, Context, Domain, EngineConfig, OpFamily, ReferenceEngine, Select};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Benchmark family-table resolution
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(1));

    group.bench_function("typed_plus_i32", |bencher| {
        bencher.iter(|| ops::plus::<i32>());
    });

    group.bench_function("family_by_domain", |bencher| {
        bencher.iter(|| OpFamily::Times.resolve(black_box(Domain::Float64)));
    });

    group.bench_function("symbol", |bencher| {
        let op = ops::plus::<f32>();
        bencher.iter(|| black_box(&op).symbol());
    });

    group.finish();
}

/// Benchmark host index conversion
fn bench_index_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_list");

    group.bench_function("all", |bencher| {
        bencher.iter(|| to_index_list(black_box(Select::<u64>::All)));
    });

    for len in [16usize, 1024, 65536] {
        let indices: Vec<i64> = (0..len as i64).rev().collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("list_i64", len), &indices, |bencher, indices| {
            bencher.iter(|| to_index_list(Select::from(black_box(indices))));
        });
    }

    group.finish();
}

/// Benchmark a full row walk over a random matrix
fn bench_cursor_walk(c: &mut Criterion) {
    let ctx = Context::init(ReferenceEngine::new(), EngineConfig::default()).expect("engine init");
    let mut rng = StdRng::seed_from_u64(42);
    let nvals = 10_000;
    let rows: Vec<u64> = (0..nvals).map(|_| rng.gen_range(0..1000)).collect();
    let cols: Vec<u64> = (0..nvals).map(|_| rng.gen_range(0..1000)).collect();
    let vals: Vec<f64> = (0..nvals).map(|_| rng.gen()).collect();

    let mut m = ctx.matrix::<f64>(1000, 1000).expect("matrix");
    m.build(&rows, &cols, &vals, ctx.operator(ops::plus::<f64>()))
        .expect("build");
    let stored = m.nvals().expect("nvals");

    let mut group = c.benchmark_group("cursor");
    group.throughput(Throughput::Elements(stored));

    group.bench_function("row_entries", |bencher| {
        bencher.iter(|| {
            let cursor = m.row_cursor().expect("cursor");
            cursor.entries().map(|(_, v)| v).sum::<f64>()
        });
    });

    group.bench_function("entry_cursor", |bencher| {
        bencher.iter(|| {
            let cursor = m.entry_cursor().expect("cursor");
            cursor.entries().count()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_index_list, bench_cursor_walk);
criterion_main!(benches);
