//! # ALICE-AlgoViz
//!
//! **Algorithm cores for interactive visualizations**
//!
//! The state machines behind the blog's algorithm widgets, free of any UI:
//! the page draws, this crate computes.
//!
//! ## Features
//!
//! | Core | Description | Memory |
//! |------|-------------|--------|
//! | **Count-Min Sketch** | Frequency estimation with probe highlighting | O(rows × cols) |
//! | **Merge Sort Trace** | Replayable step-by-step sort | O(n² log n) snapshots |
//! | **Trace Player** | Cursor with running stats | O(n) |
//!
//! ## Design Principles
//!
//! - **Pure cores**: no timers, no globals; the caller owns pacing
//! - **Deterministic**: same input, same cells, same steps
//! - **One-sided error**: sketch estimates never undercount
//! - **no_std Compatible**: the cores need only `alloc`; a no_std build
//!   links the `rlib` into a binary that supplies the allocator and panic
//!   handler (the `cdylib` output is for the `wasm` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use alice_algoviz::prelude::*;
//!
//! // Frequency estimation on a 4 × 10 table
//! let mut cms = CountMinSketch::new();
//! for item in ["apple", "banana", "apple", "Apple "] {
//!     cms.insert(item);
//! }
//! let report = cms.report("apple");
//! assert!(report.estimate >= 3);
//! assert_eq!(report.actual, 3);
//!
//! // Merge sort, one step at a time
//! let trace = Trace::generate(&[5, 3, 5, 1]).unwrap();
//! let mut player = TracePlayer::new(&trace);
//! while let Some(step) = player.step_forward() {
//!     let _ = (step.kind(), step.message());
//! }
//! assert_eq!(player.array(), &[1, 3, 5, 5]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod player;
pub mod sketch;
pub mod trace;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::AlgoError;
    pub use crate::player::{Phase, TracePlayer};
    pub use crate::sketch::{
        normalize, Cell, CountMinSketch, FnvHasher, FnvItemHasher, ItemHasher, Mergeable,
        PolynomialHasher, QueryReport, SketchConfig,
    };
    pub use crate::trace::{
        reference_comparisons, Event, Side, Span, Step, StepKind, Trace, TraceConfig, TraceOrder,
    };
}

// Re-export main types at crate root
pub use prelude::*;

// ============================================================================
// Integration Tests
// ============================================================================
