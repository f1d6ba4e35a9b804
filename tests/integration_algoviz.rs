//! Integration tests for ALICE-AlgoViz
//!
//! These tests exercise the sketch and trace cores through the public API
//! re-exported from the crate root. Inputs come from a fixed xorshift
//! generator, so every run sees the same data.

use std::cmp::Ordering;
use std::fmt;

use alice_algoviz::{
    reference_comparisons, CountMinSketch, Event, Mergeable, Phase, PolynomialHasher,
    SketchConfig, StepKind, Trace, TraceConfig, TraceOrder, TracePlayer,
};

// ============================================================================
// Helpers
// ============================================================================

/// Deterministic xorshift64 stream.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Array of `len` values in `[10, 10 + span)`, like the demo's "new array".
    fn array(&mut self, len: usize, span: u64) -> Vec<i64> {
        (0..len).map(|_| 10 + (self.next() % span) as i64).collect()
    }
}

/// Value compared only by `key`; `tag` records input position.
#[derive(Clone, Copy, Debug)]
struct Tagged {
    key: i64,
    tag: usize,
}

impl PartialEq for Tagged {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl PartialOrd for Tagged {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.key.partial_cmp(&other.key)
    }
}

impl fmt::Display for Tagged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Index of the merge completing `span`, if any.
fn merge_index<T>(trace: &Trace<T>, start: usize, end: usize) -> Option<usize> {
    trace.iter().position(|s| {
        matches!(s.event(), Event::MergeComplete { span, .. } if span.start == start && span.end == end)
    })
}

// ============================================================================
// Frequency Sketch
// ============================================================================

/// Whatever the stream, no item is ever estimated below its true count.
#[test]
fn test_sketch_never_undercounts_stream() {
    let mut rng = XorShift(0x2545_f491_4f6c_dd1d);
    let mut cms = CountMinSketch::new();
    let vocabulary: Vec<String> = (0..40).map(|i| format!("word{}", i)).collect();

    for _ in 0..2000 {
        let w = &vocabulary[(rng.next() % vocabulary.len() as u64) as usize];
        cms.insert(w);
    }

    for w in &vocabulary {
        let estimate = cms.query(w);
        assert!(estimate >= cms.actual(w), "{}: {} < {}", w, estimate, cms.actual(w));
    }
    let ledger_total: u64 = cms.ledger().map(|(_, n)| n).sum();
    assert_eq!(ledger_total, 2000);
    assert_eq!(cms.total(), 2000);
}

/// Concrete demo scenario on the 4 × 10 table.
#[test]
fn test_sketch_apple_banana() {
    let mut fnv = CountMinSketch::new();
    for _ in 0..3 {
        fnv.insert("apple");
    }
    assert!(fnv.query("apple") >= 3);
    assert!(fnv.query("banana") <= 3);

    // With the widget hash "banana" shares no row cell with "apple"
    let mut poly = CountMinSketch::with_hasher(SketchConfig::default(), PolynomialHasher).unwrap();
    for _ in 0..3 {
        poly.insert("apple");
    }
    assert_eq!(poly.query("apple"), 3);
    assert_eq!(poly.query("banana"), 0);
}

/// Counters are only ever incremented.
#[test]
fn test_sketch_counters_monotone() {
    let mut cms = CountMinSketch::with_config(SketchConfig::new(3, 5)).unwrap();
    let mut previous: Vec<Vec<u64>> = cms.iter_rows().map(|r| r.to_vec()).collect();

    for item in ["a", "b", "c", "a", "d", "e", "f", "a"] {
        cms.insert(item);
        let _ = cms.query("z");
        let current: Vec<Vec<u64>> = cms.iter_rows().map(|r| r.to_vec()).collect();
        for (prev_row, cur_row) in previous.iter().zip(&current) {
            assert!(prev_row.iter().zip(cur_row).all(|(p, c)| c >= p));
        }
        let increments: u64 = current.iter().flatten().sum::<u64>()
            - previous.iter().flatten().sum::<u64>();
        assert_eq!(increments, 3, "one increment per row");
        previous = current;
    }
}

/// Sketches fed disjoint halves of a stream merge into the whole-stream sketch.
#[test]
fn test_sketch_merge_matches_single_stream() {
    let mut rng = XorShift(99);
    let mut left = CountMinSketch::new();
    let mut right = CountMinSketch::new();
    let mut whole = CountMinSketch::new();

    for i in 0..500 {
        let item = format!("user-{}", rng.next() % 60);
        whole.insert(&item);
        if i % 2 == 0 {
            left.insert(&item);
        } else {
            right.insert(&item);
        }
    }

    left.merge(&right).unwrap();
    assert!(left.iter_rows().eq(whole.iter_rows()));
    assert!(left.ledger().eq(whole.ledger()));
}

// ============================================================================
// Step Trace
// ============================================================================

/// Replay of every trace equals the stable sort of its input.
#[test]
fn test_trace_replay_is_stable_sort() {
    let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
    for len in 0..=16 {
        for order in [TraceOrder::Interleaved, TraceOrder::DivideFirst] {
            let input: Vec<Tagged> = rng
                .array(len, 6)
                .into_iter()
                .enumerate()
                .map(|(tag, key)| Tagged { key, tag })
                .collect();
            let trace = Trace::with_config(&input, TraceConfig::with_order(order)).unwrap();

            let replayed = trace.replay();
            let mut expected = input.clone();
            expected.sort_by_key(|t| t.key);

            let keys: Vec<i64> = replayed.iter().map(|t| t.key).collect();
            let tags: Vec<usize> = replayed.iter().map(|t| t.tag).collect();
            assert_eq!(keys, expected.iter().map(|t| t.key).collect::<Vec<_>>());
            assert_eq!(tags, expected.iter().map(|t| t.tag).collect::<Vec<_>>());
            assert_eq!(trace.final_origins(), tags);
        }
    }
}

/// The demo scenario: `[5, 3, 5, 1]`.
#[test]
fn test_trace_demo_scenario() {
    let input = [
        Tagged { key: 5, tag: 0 },
        Tagged { key: 3, tag: 1 },
        Tagged { key: 5, tag: 2 },
        Tagged { key: 1, tag: 3 },
    ];
    let trace = Trace::generate(&input).unwrap();
    let replayed = trace.replay();

    assert_eq!(
        replayed.iter().map(|t| t.key).collect::<Vec<_>>(),
        vec![1, 3, 5, 5]
    );
    assert_eq!(
        replayed.iter().map(|t| t.tag).collect::<Vec<_>>(),
        vec![3, 1, 0, 2]
    );
    // Caller data is untouched
    assert_eq!(input[0].tag, 0);
    assert_eq!(trace.input()[3].key, 1);
}

/// Generating twice yields identical traces.
#[test]
fn test_trace_idempotent_generation() {
    let mut rng = XorShift(7);
    let input = rng.array(12, 90);
    for order in [TraceOrder::Interleaved, TraceOrder::DivideFirst] {
        let config = TraceConfig::with_order(order);
        let a = Trace::with_config(&input, config).unwrap();
        let b = Trace::with_config(&input, config).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a, b);
    }
}

/// Empty and singleton inputs: a lone completion step.
#[test]
fn test_trace_boundaries() {
    for input in [&[][..], &[7][..]] {
        let trace = Trace::generate(input).unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.steps()[0].kind(), StepKind::Done);
        assert_eq!(trace.comparisons(), 0);
    }
}

/// Compare steps equal the comparisons of an uninstrumented merge sort.
#[test]
fn test_trace_comparison_count() {
    let mut rng = XorShift(1234);
    for len in 2..=16 {
        let mut input: Vec<i64> = (0..len as i64).map(|i| i * 7 + 3).collect();
        // Fisher-Yates with the fixed stream: distinct values, shuffled
        for i in (1..input.len()).rev() {
            let j = (rng.next() % (i as u64 + 1)) as usize;
            input.swap(i, j);
        }
        let trace = Trace::generate(&input).unwrap();
        assert_eq!(trace.count(StepKind::Compare), reference_comparisons(&input));
    }
}

/// Divisions of a subtree precede its merges; a subtree merges before its parent.
#[test]
fn test_trace_ordering_invariant() {
    let input: Vec<i64> = XorShift(55).array(11, 90);
    for order in [TraceOrder::Interleaved, TraceOrder::DivideFirst] {
        let trace = Trace::with_config(&input, TraceConfig::with_order(order)).unwrap();

        for (i, step) in trace.iter().enumerate() {
            if let Event::Divide { span, left, right } = step.event() {
                let parent_merge = merge_index(&trace, span.start, span.end).unwrap();
                assert!(i < parent_merge);
                for child in [left, right] {
                    if child.len() > 1 {
                        let child_merge = merge_index(&trace, child.start, child.end).unwrap();
                        assert!(child_merge < parent_merge, "{:?}: child after parent", order);
                    }
                }
            }
        }
        // Each merge's compare/place steps sit right before its completion
        for (i, step) in trace.iter().enumerate() {
            if matches!(step.kind(), StepKind::Compare | StepKind::Place) {
                let span = step.active().unwrap();
                let done = merge_index(&trace, span.start, span.end).unwrap();
                assert!(i < done);
            }
        }
    }
}

/// A full playback mirrors the trace totals.
#[test]
fn test_player_full_playback() {
    let input = XorShift(2024).array(8, 90);
    let trace = Trace::generate(&input).unwrap();
    let mut player = TracePlayer::new(&trace);

    let mut seen_merge_phase = false;
    while let Some(step) = player.step_forward() {
        assert_eq!(player.message(), step.message());
        assert_eq!(player.array(), step.array());
        seen_merge_phase |= player.phase() == Phase::Merge;
    }
    assert!(seen_merge_phase);
    assert_eq!(player.comparisons(), trace.comparisons());
    assert_eq!(player.merges(), 7);

    let mut sorted = input.clone();
    sorted.sort();
    assert_eq!(player.array(), sorted.as_slice());
}
