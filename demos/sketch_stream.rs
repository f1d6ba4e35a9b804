//! Count-Min Sketch Example
//!
//! Feeds a skewed word stream into the 4 × 10 demo table, then prints the
//! table and how far each estimate drifts from the exact count.
//!
//! ```bash
//! cargo run --example sketch_stream
//! ```

use alice_algoviz::sketch::{CountMinSketch, PolynomialHasher, SketchConfig};

fn main() {
    // Same shape and hash as the blog widget
    let mut cms = CountMinSketch::with_hasher(SketchConfig::default(), PolynomialHasher)
        .expect("default config is valid");

    let stream = [
        ("apple", 12),
        ("banana", 7),
        ("cherry", 4),
        ("date", 2),
        ("elderberry", 1),
    ];
    for (item, count) in stream {
        cms.insert_count(item, count);
    }

    println!("=== Count-Min Sketch ({} x {}) ===", cms.rows(), cms.cols());
    for (r, row) in cms.iter_rows().enumerate() {
        let cells: Vec<String> = row.iter().map(|c| format!("{:>3}", c)).collect();
        println!("h{}: {}", r + 1, cells.join(" "));
    }
    println!();

    for (item, _) in stream {
        let report = cms.report(item);
        let cells: Vec<String> = report
            .cells
            .iter()
            .map(|c| format!("({},{})", c.row, c.col))
            .collect();
        println!(
            "{:<11} {}  over by {}  cells {}",
            item,
            report,
            report.overestimate(),
            cells.join(" ")
        );
    }

    // Never seen, but may still collide
    println!("{:<11} {}", "fig", cms.report("fig"));

    println!();
    println!(
        "Inserted {} items, {} distinct, epsilon = e/width = {:.3}",
        cms.total(),
        cms.distinct(),
        cms.error_bound()
    );
}
