//! AlgoViz Error Types
//!
//! Unified error type for the visualization cores. The algorithms themselves
//! never fail; errors are raised only at the boundaries (configuration,
//! sketch merging, trace input validation, cursor seeking) and returned as
//! `Result<T, AlgoError>` instead of panicking.

use core::fmt;

/// Unified error type for sketch and trace operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgoError {
    /// Invalid configuration parameter.
    InvalidConfiguration {
        /// Description of the invalid configuration
        reason: &'static str,
    },
    /// Two sketches with different shapes or seeds cannot be combined.
    DimensionMismatch {
        /// `(rows, cols)` of the receiving sketch
        expected: (usize, usize),
        /// `(rows, cols)` of the other sketch
        found: (usize, usize),
    },
    /// Two sketches of the same shape were built with different row seeds.
    SeedMismatch {
        /// Seed multiplier of the receiving sketch
        expected: u64,
        /// Seed multiplier of the other sketch
        found: u64,
    },
    /// An input value is not ordered with respect to itself (e.g. `NaN`).
    IncomparableValue {
        /// Position of the offending value in the input
        index: usize,
    },
    /// A trace input exceeds the configured length limit.
    InputTooLong {
        /// Length of the rejected input
        len: usize,
        /// Configured maximum
        max: usize,
    },
    /// A playback cursor was moved past the end of a trace.
    CursorOutOfRange {
        /// Requested cursor position
        position: usize,
        /// Number of steps in the trace
        len: usize,
    },
}

impl fmt::Display for AlgoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "sketch dimensions differ: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            Self::SeedMismatch { expected, found } => write!(
                f,
                "sketch seed multipliers differ: expected {expected}, found {found}"
            ),
            Self::IncomparableValue { index } => {
                write!(f, "value at index {index} is not comparable")
            }
            Self::InputTooLong { len, max } => {
                write!(f, "input of {len} values exceeds limit (max={max})")
            }
            Self::CursorOutOfRange { position, len } => {
                write!(f, "cursor {position} out of range (len={len})")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AlgoError {}

// ============================================================================
// Tests
// ============================================================================
