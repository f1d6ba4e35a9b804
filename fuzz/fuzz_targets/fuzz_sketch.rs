#![no_main]
use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use alice_algoviz::{CountMinSketch, Mergeable, PolynomialHasher, SketchConfig};

#[derive(Debug, Arbitrary)]
struct SketchInput {
    /// Table shape (capped)
    rows: u8,
    cols: u8,
    /// Items to insert, arbitrary UTF-8
    items: Vec<String>,
    /// Items to query afterwards
    queries: Vec<String>,
}

// Fuzz insert/query with arbitrary strings and shapes.
// Estimates must never fall below the exact counts.
fuzz_target!(|input: SketchInput| {
    let config = SketchConfig::new(
        (input.rows as usize % 8) + 1,
        (input.cols as usize % 64) + 1,
    );
    let mut fnv = CountMinSketch::with_config(config).unwrap();
    let mut poly = CountMinSketch::with_hasher(config, PolynomialHasher).unwrap();

    for item in input.items.iter().take(256) {
        fnv.insert(item);
        poly.insert(item);
    }

    for item in input.queries.iter().chain(input.items.iter()).take(256) {
        assert!(fnv.query(item) >= fnv.actual(item));
        assert!(poly.query(item) >= poly.actual(item));
        assert!(fnv.last_touched().len() <= config.rows);
    }

    let copy = fnv.clone();
    fnv.merge(&copy).unwrap();
    assert_eq!(fnv.total(), copy.total() * 2);
});
