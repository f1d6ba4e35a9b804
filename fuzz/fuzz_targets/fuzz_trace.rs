#![no_main]
use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use alice_algoviz::{Trace, TraceConfig, TraceOrder, TracePlayer};

#[derive(Debug, Arbitrary)]
struct TraceInput {
    /// Values to sort (small range forces duplicates)
    values: Vec<i8>,
    /// Use the two-pass order
    divide_first: bool,
    /// Cursor to seek to
    cursor: u16,
}

// Fuzz trace generation and playback.
// Replay must equal the sorted input; seeking must never panic.
fuzz_target!(|input: TraceInput| {
    let values: Vec<i8> = input.values.into_iter().take(64).collect();
    let order = if input.divide_first {
        TraceOrder::DivideFirst
    } else {
        TraceOrder::Interleaved
    };
    let trace = Trace::with_config(&values, TraceConfig::with_order(order)).unwrap();

    let mut expected = values.clone();
    expected.sort();
    assert_eq!(trace.replay(), expected);
    assert_eq!(trace.sorted(), expected.as_slice());

    let mut player = TracePlayer::new(&trace);
    let cursor = input.cursor as usize;
    match player.seek(cursor) {
        Ok(()) => assert_eq!(player.array(), trace.replay_to(cursor).as_slice()),
        Err(_) => assert!(cursor > trace.len()),
    }
});
