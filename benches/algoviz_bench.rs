//! Benchmarks for ALICE-AlgoViz
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use alice_algoviz::{
    CountMinSketch, PolynomialHasher, SketchConfig, Trace, TraceConfig, TraceOrder, TracePlayer,
};

fn words(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("item-{}", i % 97)).collect()
}

fn values(n: usize) -> Vec<i64> {
    let mut x: u64 = 0x853c_49e6_748f_ea9b;
    (0..n)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            10 + (x % 90) as i64
        })
        .collect()
}

// ============================================================================
// Sketch benchmarks
// ============================================================================

fn bench_sketch(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_min_sketch");
    let stream = words(1000);

    group.bench_function("insert_1000_fnv", |b| {
        b.iter(|| {
            let mut cms = CountMinSketch::new();
            for w in &stream {
                cms.insert(black_box(w));
            }
            cms.total()
        });
    });

    group.bench_function("insert_1000_polynomial", |b| {
        b.iter(|| {
            let mut cms =
                CountMinSketch::with_hasher(SketchConfig::default(), PolynomialHasher).unwrap();
            for w in &stream {
                cms.insert(black_box(w));
            }
            cms.total()
        });
    });

    let mut wide = CountMinSketch::with_config(SketchConfig::new(7, 2048)).unwrap();
    for w in &stream {
        wide.insert(w);
    }
    group.bench_function("query_7x2048", |b| {
        b.iter(|| wide.query(black_box("item-42")));
    });

    let keys: Vec<&str> = stream.iter().map(String::as_str).collect();
    group.bench_function("estimate_batch_1000", |b| {
        b.iter(|| wide.estimate_batch(black_box(&keys)));
    });

    group.finish();
}

// ============================================================================
// Trace benchmarks
// ============================================================================

fn bench_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_sort_trace");
    let small = values(8);
    let large = values(128);

    group.bench_function("generate_8", |b| {
        b.iter(|| Trace::generate(black_box(&small)).unwrap().len());
    });

    let interleaved = TraceConfig {
        max_len: large.len(),
        ..TraceConfig::default()
    };
    group.bench_function("generate_128_interleaved", |b| {
        b.iter(|| Trace::with_config(black_box(&large), interleaved).unwrap().len());
    });

    group.bench_function("generate_128_divide_first", |b| {
        let config = TraceConfig {
            order: TraceOrder::DivideFirst,
            ..interleaved
        };
        b.iter(|| Trace::with_config(black_box(&large), config).unwrap().len());
    });

    let trace = Trace::with_config(&large, interleaved).unwrap();
    group.bench_function("play_128", |b| {
        b.iter(|| {
            let mut player = TracePlayer::new(&trace);
            while player.step_forward().is_some() {}
            player.comparisons()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sketch, bench_trace);
criterion_main!(benches);
