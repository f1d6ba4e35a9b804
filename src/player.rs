//! Trace Playback Cursor
//!
//! A [`TracePlayer`] walks a [`Trace`] one step at a time and keeps the
//! running state a visualizer shows next to the array: the replayed working
//! array, comparisons and merges so far, the current phase and the status
//! line. It has no notion of time; the caller decides when to advance.
//!
//! # Examples
//!
//! ```
//! use alice_algoviz::player::{Phase, TracePlayer};
//! use alice_algoviz::trace::Trace;
//!
//! let trace = Trace::generate(&[38, 27, 43, 3]).unwrap();
//! let mut player = TracePlayer::new(&trace);
//! assert_eq!(player.phase(), Phase::Ready);
//!
//! while player.step_forward().is_some() {}
//! assert_eq!(player.phase(), Phase::Complete);
//! assert_eq!(player.array(), &[3, 27, 38, 43]);
//! assert_eq!(player.comparisons(), trace.comparisons());
//! ```

use alloc::vec::Vec;
use core::fmt;

use crate::error::AlgoError;
use crate::trace::{Step, StepKind, Trace};

/// Status line shown before the first step.
pub const READY_MESSAGE: &str = "Click Play to start the merge sort visualization";

/// Coarse playback phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing played yet
    #[default]
    Ready,
    /// Splitting ranges
    Divide,
    /// Comparing and placing
    Merge,
    /// The `Done` step has been played
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "Ready",
            Self::Divide => "Divide",
            Self::Merge => "Merge",
            Self::Complete => "Complete",
        })
    }
}

/// Cursor over a borrowed trace.
#[derive(Clone, Debug)]
pub struct TracePlayer<'a, T> {
    trace: &'a Trace<T>,
    position: usize,
    working: Vec<T>,
    comparisons: usize,
    merges: usize,
    phase: Phase,
}

impl<'a, T: Copy> TracePlayer<'a, T> {
    /// Cursor at position 0 (nothing played).
    pub fn new(trace: &'a Trace<T>) -> Self {
        Self {
            trace,
            position: 0,
            working: trace.input().to_vec(),
            comparisons: 0,
            merges: 0,
            phase: Phase::Ready,
        }
    }

    /// Play the next step. Returns `None` once the trace is exhausted.
    pub fn step_forward(&mut self) -> Option<&'a Step<T>> {
        let trace = self.trace;
        let step = trace.get(self.position)?;
        step.apply(&mut self.working);
        match step.kind() {
            StepKind::Divide => self.phase = Phase::Divide,
            StepKind::Compare => {
                self.comparisons += 1;
                self.phase = Phase::Merge;
            }
            StepKind::MergeComplete => {
                self.merges += 1;
                self.phase = Phase::Merge;
            }
            StepKind::Done => self.phase = Phase::Complete,
            StepKind::Single | StepKind::Place => {}
        }
        self.position += 1;
        Some(step)
    }

    /// Undo the last step. Returns `false` at position 0.
    pub fn step_back(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        let target = self.position - 1;
        self.replay_to(target);
        true
    }

    /// Move to `position` (number of steps played).
    pub fn seek(&mut self, position: usize) -> Result<(), AlgoError> {
        if position > self.trace.len() {
            return Err(AlgoError::CursorOutOfRange {
                position,
                len: self.trace.len(),
            });
        }
        if position < self.position {
            self.replay_to(position);
        } else {
            while self.position < position {
                self.step_forward();
            }
        }
        Ok(())
    }

    /// Back to position 0.
    pub fn rewind(&mut self) {
        self.position = 0;
        self.working.copy_from_slice(self.trace.input());
        self.comparisons = 0;
        self.merges = 0;
        self.phase = Phase::Ready;
    }

    fn replay_to(&mut self, position: usize) {
        self.rewind();
        while self.position < position {
            self.step_forward();
        }
    }
}

impl<'a, T> TracePlayer<'a, T> {
    /// Steps played so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every step has been played.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.position >= self.trace.len()
    }

    /// Fraction of the trace played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.trace.is_empty() {
            1.0
        } else {
            self.position as f64 / self.trace.len() as f64
        }
    }

    /// Last played step.
    pub fn current(&self) -> Option<&'a Step<T>> {
        let trace = self.trace;
        self.position.checked_sub(1).and_then(|i| trace.get(i))
    }

    /// Step that `step_forward` would play.
    pub fn peek(&self) -> Option<&'a Step<T>> {
        let trace = self.trace;
        trace.get(self.position)
    }

    /// Working array with every played mutation applied.
    #[inline]
    pub fn array(&self) -> &[T] {
        &self.working
    }

    /// Comparisons played so far.
    #[inline]
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// Completed merges played so far.
    #[inline]
    pub fn merges(&self) -> usize {
        self.merges
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Status line: the last played step's message.
    pub fn message(&self) -> &'a str {
        self.current().map_or(READY_MESSAGE, |step| step.message())
    }

    /// The trace being played.
    #[inline]
    pub fn trace(&self) -> &'a Trace<T> {
        self.trace
    }
}

impl<'a, T: Copy> Iterator for TracePlayer<'a, T> {
    type Item = &'a Step<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step_forward()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.trace.len() - self.position;
        (left, Some(left))
    }
}

// ============================================================================
// Tests
// ============================================================================
