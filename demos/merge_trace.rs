//! Merge Sort Trace Example
//!
//! Generates a step trace for a small array and plays it back the way the
//! visualizer does, printing the status line and working array per step.
//!
//! ```bash
//! cargo run --example merge_trace
//! ```

use alice_algoviz::player::TracePlayer;
use alice_algoviz::trace::{Trace, TraceConfig, TraceOrder};

fn main() {
    let input = [38, 27, 43, 3, 9, 82, 10];

    let trace = Trace::with_config(&input, TraceConfig::with_order(TraceOrder::Interleaved))
        .expect("input is short and totally ordered");

    println!("=== Merge Sort Trace ===");
    println!("Input:  {:?}", input);
    println!("Steps:  {}", trace.len());
    println!();

    let mut player = TracePlayer::new(&trace);
    println!("[{:>3}] {}", player.position(), player.message());
    while let Some(step) = player.step_forward() {
        println!(
            "[{:>3}] {:<14} {:<45} {:?}",
            player.position(),
            step.kind().as_str(),
            step.message(),
            player.array()
        );
    }

    println!();
    println!("Phase:       {}", player.phase());
    println!("Comparisons: {}", player.comparisons());
    println!("Merges:      {}", player.merges());
    println!("Sorted:      {:?}", trace.sorted());

    // The tree view lists every split before the first merge
    let tree = Trace::with_config(&input, TraceConfig::with_order(TraceOrder::DivideFirst))
        .expect("input is short and totally ordered");
    let first_merge = tree
        .iter()
        .position(|s| s.merging().is_some())
        .unwrap_or(tree.len());
    println!();
    println!(
        "Tree order: {} steps, first placement at step {}",
        tree.len(),
        first_merge + 1
    );
}
