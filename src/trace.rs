//! Merge Sort Step Traces
//!
//! Runs a top-down merge sort over a fixed input and records every
//! visualization-relevant event as an immutable [`Step`]: range divisions,
//! base cases, comparisons, placements and completed merges. A renderer can
//! then play the algorithm forwards, backwards or at any speed by indexing
//! into the [`Trace`] without re-running the sort.
//!
//! Ranges are inclusive `[start, end]` split at `mid = (start + end) / 2`
//! into `[start, mid]` and `[mid + 1, end]`. Ties place the left element
//! first, which keeps the sort stable.
//!
//! # Examples
//!
//! ```
//! use alice_algoviz::trace::{StepKind, Trace};
//!
//! let trace = Trace::generate(&[5, 3, 5, 1]).unwrap();
//! assert_eq!(trace.sorted(), &[1, 3, 5, 5]);
//! assert_eq!(trace.replay(), vec![1, 3, 5, 5]);
//! assert_eq!(trace.steps().last().map(|s| s.kind()), Some(StepKind::Done));
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::RangeInclusive;

use crate::error::AlgoError;

/// Default upper bound on input length.
///
/// Every step carries a full-array snapshot, so trace memory grows as
/// `O(n² log n)`. Raise it through [`TraceConfig::max_len`] when needed.
pub const DEFAULT_MAX_LEN: usize = 64;

// ============================================================================
// Configuration
// ============================================================================

/// Order in which divide and merge steps are emitted.
///
/// Both orders list a subtree's divisions before its merges and a subtree's
/// merges before its parent's merge; they differ only in whether sibling
/// subtrees are fully divided before any merging starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraceOrder {
    /// One recursive pass: divide, recurse left, recurse right, merge.
    #[default]
    Interleaved,
    /// Two passes: every division first, then every merge.
    DivideFirst,
}

/// Trace generation options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceConfig {
    /// Step ordering
    pub order: TraceOrder,
    /// Longest accepted input
    pub max_len: usize,
}

impl TraceConfig {
    /// Default config with the given order.
    pub const fn with_order(order: TraceOrder) -> Self {
        Self {
            order,
            max_len: DEFAULT_MAX_LEN,
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::with_order(TraceOrder::Interleaved)
    }
}

// ============================================================================
// Step Types
// ============================================================================

/// Kind tag of a [`Step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// A range with more than one element is split
    Divide,
    /// A single-element range reached the base case
    Single,
    /// Two candidate values are compared
    Compare,
    /// A value is written into the merged output
    Place,
    /// A range finished merging
    MergeComplete,
    /// The whole sort finished
    Done,
}

impl StepKind {
    /// Stable lowercase tag (`"merge_complete"` etc.).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Divide => "divide",
            Self::Single => "single",
            Self::Compare => "compare",
            Self::Place => "place",
            Self::MergeComplete => "merge_complete",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of a merge a placed value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The `[start, mid]` half
    Left,
    /// The `[mid + 1, end]` half
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Inclusive index range `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    /// First index
    pub start: usize,
    /// Last index (inclusive)
    pub end: usize,
}

impl Span {
    /// Span covering `start..=end`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of indices covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always `false`: a span covers at least one index.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Split point `(start + end) / 2`.
    #[inline]
    pub const fn mid(&self) -> usize {
        self.start + (self.end - self.start) / 2
    }

    /// Whether `index` lies inside.
    #[inline]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Indices covered, in order.
    #[inline]
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}...{}]", self.start, self.end)
    }
}

/// Event payload of a [`Step`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event<T> {
    /// `span` is split into `left` and `right`.
    Divide {
        /// Range being split
        span: Span,
        /// Lower half
        left: Span,
        /// Upper half
        right: Span,
    },
    /// Base case: the lone element at `index`.
    Single {
        /// Position of the element
        index: usize,
        /// The element
        value: T,
    },
    /// The heads of both halves are compared.
    Compare {
        /// Source index of the left candidate
        left_index: usize,
        /// Source index of the right candidate
        right_index: usize,
        /// Left candidate
        left_value: T,
        /// Right candidate
        right_value: T,
    },
    /// `value` is written to `target`.
    Place {
        /// Value written
        value: T,
        /// Half it came from
        side: Side,
        /// Array index written
        target: usize,
        /// Position of this element in the original input
        origin: usize,
        /// Whether the other half was already exhausted (no comparison)
        remaining: bool,
    },
    /// `span` now holds `merged`, in order.
    MergeComplete {
        /// Range that finished merging
        span: Span,
        /// Sorted contents of the range
        merged: Vec<T>,
    },
    /// Sorting finished.
    Done,
}

/// One atomic, replayable event of a merge sort run.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<T> {
    event: Event<T>,
    array: Vec<T>,
    node: Vec<T>,
    active: Option<Span>,
    message: String,
}

impl<T> Step<T> {
    /// Kind tag.
    pub fn kind(&self) -> StepKind {
        match self.event {
            Event::Divide { .. } => StepKind::Divide,
            Event::Single { .. } => StepKind::Single,
            Event::Compare { .. } => StepKind::Compare,
            Event::Place { .. } => StepKind::Place,
            Event::MergeComplete { .. } => StepKind::MergeComplete,
            Event::Done => StepKind::Done,
        }
    }

    /// Event payload.
    #[inline]
    pub fn event(&self) -> &Event<T> {
        &self.event
    }

    /// Full working array after this step (array view).
    #[inline]
    pub fn array(&self) -> &[T] {
        &self.array
    }

    /// Node-local values (tree view): the range being divided, the lone
    /// element, the merged output so far, or the finished merge.
    #[inline]
    pub fn node(&self) -> &[T] {
        &self.node
    }

    /// Range the step operates on.
    #[inline]
    pub fn active(&self) -> Option<Span> {
        self.active
    }

    /// Indices being compared.
    pub fn comparing(&self) -> Option<(usize, usize)> {
        match self.event {
            Event::Compare {
                left_index,
                right_index,
                ..
            } => Some((left_index, right_index)),
            _ => None,
        }
    }

    /// Index being written.
    pub fn merging(&self) -> Option<usize> {
        match self.event {
            Event::Place { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Human-readable description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether replaying this step changes the working array.
    #[inline]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self.event,
            Event::Place { .. } | Event::MergeComplete { .. }
        )
    }
}

impl<T: Copy> Step<T> {
    /// Apply this step's mutation (if any) to `working`.
    ///
    /// Indices outside `working` are ignored.
    pub fn apply(&self, working: &mut [T]) {
        match &self.event {
            Event::Place { value, target, .. } => {
                if let Some(slot) = working.get_mut(*target) {
                    *slot = *value;
                }
            }
            Event::MergeComplete { span, merged } => {
                if let Some(range) = working.get_mut(span.indices()) {
                    range.copy_from_slice(merged);
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// Trace
// ============================================================================

/// Ordered, immutable list of steps for one merge sort run.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace<T> {
    input: Vec<T>,
    sorted: Vec<T>,
    steps: Vec<Step<T>>,
    order: TraceOrder,
    comparisons: usize,
    merges: usize,
}

impl<T> Trace<T>
where
    T: Copy + PartialOrd + fmt::Display,
{
    /// Trace `input` with the default (interleaved) order.
    pub fn generate(input: &[T]) -> Result<Self, AlgoError> {
        Self::with_config(input, TraceConfig::default())
    }

    /// Trace `input` with explicit options.
    ///
    /// Fails if the input is longer than `config.max_len` or contains a
    /// value that is not ordered with respect to itself (such as `NaN`).
    pub fn with_config(input: &[T], config: TraceConfig) -> Result<Self, AlgoError> {
        if input.len() > config.max_len {
            return Err(AlgoError::InputTooLong {
                len: input.len(),
                max: config.max_len,
            });
        }
        if let Some(index) = input.iter().position(|v| v.partial_cmp(v).is_none()) {
            return Err(AlgoError::IncomparableValue { index });
        }

        let mut recorder = Recorder::new(input);
        if input.len() > 1 {
            let root = Span::new(0, input.len() - 1);
            match config.order {
                TraceOrder::Interleaved => recorder.sort_range(root),
                TraceOrder::DivideFirst => {
                    recorder.divide_pass(root);
                    recorder.merge_pass(root);
                }
            }
        }
        recorder.done();

        let trace = Self {
            input: input.to_vec(),
            sorted: recorder.working,
            steps: recorder.steps,
            order: config.order,
            comparisons: recorder.comparisons,
            merges: recorder.merges,
        };
        tracing::debug!(
            len = trace.input.len(),
            steps = trace.steps.len(),
            comparisons = trace.comparisons,
            order = ?trace.order,
            "merge sort trace generated"
        );
        Ok(trace)
    }
}

impl<T> Trace<T> {
    /// Input as given.
    #[inline]
    pub fn input(&self) -> &[T] {
        &self.input
    }

    /// Input in stable ascending order.
    #[inline]
    pub fn sorted(&self) -> &[T] {
        &self.sorted
    }

    /// All steps, in playback order.
    #[inline]
    pub fn steps(&self) -> &[Step<T>] {
        &self.steps
    }

    /// Step at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Step<T>> {
        self.steps.get(index)
    }

    /// Iterate steps in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Step<T>> {
        self.steps.iter()
    }

    /// Number of steps. Never zero: every trace ends with a `Done` step.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Ordering the trace was generated with.
    #[inline]
    pub fn order(&self) -> TraceOrder {
        self.order
    }

    /// Total `Compare` steps.
    #[inline]
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// Total `MergeComplete` steps.
    #[inline]
    pub fn merges(&self) -> usize {
        self.merges
    }

    /// Number of steps of the given kind.
    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|s| s.kind() == kind).count()
    }

    /// Input positions in final order, recovered from the `Place` steps.
    ///
    /// For a stable sort, equal values keep increasing origins.
    pub fn final_origins(&self) -> Vec<usize> {
        let mut origins: Vec<usize> = (0..self.input.len()).collect();
        for step in &self.steps {
            if let Event::Place { target, origin, .. } = step.event {
                origins[target] = origin;
            }
        }
        origins
    }
}

impl<T: Copy> Trace<T> {
    /// Apply every mutation to a copy of the input.
    pub fn replay(&self) -> Vec<T> {
        self.replay_to(self.steps.len())
    }

    /// Apply the mutations of the first `cursor` steps to a copy of the
    /// input. `cursor` is clamped to the trace length.
    pub fn replay_to(&self, cursor: usize) -> Vec<T> {
        let mut working = self.input.clone();
        for step in &self.steps[..cursor.min(self.steps.len())] {
            step.apply(&mut working);
        }
        working
    }
}

impl<'a, T> IntoIterator for &'a Trace<T> {
    type Item = &'a Step<T>;
    type IntoIter = core::slice::Iter<'a, Step<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

// ============================================================================
// Recorder
// ============================================================================

struct Recorder<T> {
    working: Vec<T>,
    origins: Vec<usize>,
    steps: Vec<Step<T>>,
    comparisons: usize,
    merges: usize,
}

impl<T> Recorder<T>
where
    T: Copy + PartialOrd + fmt::Display,
{
    fn new(input: &[T]) -> Self {
        Self {
            working: input.to_vec(),
            origins: (0..input.len()).collect(),
            steps: Vec::new(),
            comparisons: 0,
            merges: 0,
        }
    }

    fn push(&mut self, event: Event<T>, node: Vec<T>, active: Option<Span>, message: String) {
        self.steps.push(Step {
            event,
            array: self.working.clone(),
            node,
            active,
            message,
        });
    }

    /// Single-pass recursion: divide, sort halves, merge.
    fn sort_range(&mut self, span: Span) {
        if span.start >= span.end {
            self.single(span.start);
            return;
        }
        let (left, right) = self.divide(span);
        self.sort_range(left);
        self.sort_range(right);
        self.merge(span);
    }

    /// Descent only: every divide and single step.
    fn divide_pass(&mut self, span: Span) {
        if span.start >= span.end {
            self.single(span.start);
            return;
        }
        let (left, right) = self.divide(span);
        self.divide_pass(left);
        self.divide_pass(right);
    }

    /// Ascent only: every merge, post-order.
    fn merge_pass(&mut self, span: Span) {
        if span.start >= span.end {
            return;
        }
        let mid = span.mid();
        self.merge_pass(Span::new(span.start, mid));
        self.merge_pass(Span::new(mid + 1, span.end));
        self.merge(span);
    }

    fn divide(&mut self, span: Span) -> (Span, Span) {
        let mid = span.mid();
        let left = Span::new(span.start, mid);
        let right = Span::new(mid + 1, span.end);
        let node = self.working[span.indices()].to_vec();
        let message = alloc::fmt::format(format_args!(
            "Dividing range {span} into {left} and {right}."
        ));
        self.push(Event::Divide { span, left, right }, node, Some(span), message);
        (left, right)
    }

    fn single(&mut self, index: usize) {
        let value = self.working[index];
        let message = alloc::fmt::format(format_args!(
            "Single element [{value}] - base case reached"
        ));
        self.push(
            Event::Single { index, value },
            alloc::vec![value],
            Some(Span::new(index, index)),
            message,
        );
    }

    fn merge(&mut self, span: Span) {
        let mid = span.mid();
        let left: Vec<(T, usize)> = (span.start..=mid)
            .map(|i| (self.working[i], self.origins[i]))
            .collect();
        let right: Vec<(T, usize)> = (mid + 1..=span.end)
            .map(|i| (self.working[i], self.origins[i]))
            .collect();

        let mut merged: Vec<T> = Vec::with_capacity(span.len());
        let (mut i, mut j) = (0, 0);

        while i < left.len() && j < right.len() {
            let (lv, _) = left[i];
            let (rv, _) = right[j];
            self.comparisons += 1;
            let message = alloc::fmt::format(format_args!("Comparing {lv} and {rv}."));
            self.push(
                Event::Compare {
                    left_index: span.start + i,
                    right_index: mid + 1 + j,
                    left_value: lv,
                    right_value: rv,
                },
                merged.clone(),
                Some(span),
                message,
            );

            if lv <= rv {
                self.place(span, &mut merged, left[i], Side::Left, false);
                i += 1;
            } else {
                self.place(span, &mut merged, right[j], Side::Right, false);
                j += 1;
            }
        }
        for &entry in &left[i..] {
            self.place(span, &mut merged, entry, Side::Left, true);
        }
        for &entry in &right[j..] {
            self.place(span, &mut merged, entry, Side::Right, true);
        }

        self.merges += 1;
        let message = alloc::fmt::format(format_args!(
            "Merge complete: [{}]",
            ListDisplay(&merged)
        ));
        self.push(
            Event::MergeComplete {
                span,
                merged: merged.clone(),
            },
            merged,
            Some(span),
            message,
        );
    }

    fn place(
        &mut self,
        span: Span,
        merged: &mut Vec<T>,
        (value, origin): (T, usize),
        side: Side,
        remaining: bool,
    ) {
        let target = span.start + merged.len();
        merged.push(value);
        self.working[target] = value;
        self.origins[target] = origin;

        let message = if remaining {
            alloc::fmt::format(format_args!("Placing remaining {value} (from {side})"))
        } else {
            alloc::fmt::format(format_args!("Placing {value} (from {side})"))
        };
        self.push(
            Event::Place {
                value,
                side,
                target,
                origin,
                remaining,
            },
            merged.clone(),
            Some(span),
            message,
        );
    }

    fn done(&mut self) {
        let node = self.working.clone();
        self.push(Event::Done, node, None, String::from("Sort complete!"));
    }
}

/// Comma-separated values.
struct ListDisplay<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for ListDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Reference
// ============================================================================

/// Comparison count of the same merge sort without any instrumentation.
pub fn reference_comparisons<T: Copy + PartialOrd>(input: &[T]) -> usize {
    fn sort<T: Copy + PartialOrd>(buf: &mut [T], count: &mut usize) {
        if buf.len() < 2 {
            return;
        }
        // Left half is the larger one: [start, (start + end) / 2]
        let split = (buf.len() + 1) / 2;
        sort(&mut buf[..split], count);
        sort(&mut buf[split..], count);

        let left = buf[..split].to_vec();
        let right = buf[split..].to_vec();
        let (mut i, mut j, mut k) = (0, 0, 0);
        while i < left.len() && j < right.len() {
            *count += 1;
            if left[i] <= right[j] {
                buf[k] = left[i];
                i += 1;
            } else {
                buf[k] = right[j];
                j += 1;
            }
            k += 1;
        }
        buf[k..k + left.len() - i].copy_from_slice(&left[i..]);
        k += left.len() - i;
        buf[k..].copy_from_slice(&right[j..]);
    }

    let mut buf = input.to_vec();
    let mut count = 0;
    sort(&mut buf, &mut count);
    count
}

// ============================================================================
// Tests
// ============================================================================
