//! Count-Min Sketch Frequency Estimation
//!
//! A fixed `rows × cols` grid of counters approximating per-item frequencies
//! in an unbounded stream. Every insert increments one probed cell per row;
//! a query returns the minimum over the same cells, so estimates can only
//! overcount (collisions inflate shared cells, nothing ever decrements).
//!
//! Alongside the approximate table the sketch keeps an exact ledger of the
//! normalized items it has seen and the cells touched by the last operation,
//! which is what a renderer needs to highlight probes and show
//! "estimated vs. actual".
//!
//! # Examples
//!
//! ```
//! use alice_algoviz::sketch::CountMinSketch;
//!
//! // Default demo shape: 4 rows × 10 columns
//! let mut cms = CountMinSketch::new();
//! for _ in 0..3 {
//!     cms.insert("apple");
//! }
//! assert!(cms.query("Apple ") >= 3);
//! assert_eq!(cms.last_touched().len(), 4);
//!
//! cms.reset();
//! assert_eq!(cms.query("apple"), 0);
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hasher;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::AlgoError;

/// Default number of hash rows.
pub const DEFAULT_ROWS: usize = 4;

/// Default number of columns per row.
pub const DEFAULT_COLS: usize = 10;

/// Default per-row seed step: `seed(r) = r * 1337`.
pub const DEFAULT_SEED_MULTIPLIER: u64 = 1337;

/// Upper bound on `rows * cols`.
pub const MAX_CELLS: usize = 1 << 24;

// ============================================================================
// Mergeable Trait - Sketches built on separate streams can be combined
// ============================================================================

/// Trait for mergeable probabilistic data structures
pub trait Mergeable {
    /// Merge another sketch into this one.
    ///
    /// Fails without modifying `self` when the two sketches are not
    /// shape-compatible.
    fn merge(&mut self, other: &Self) -> Result<(), AlgoError>;
}

// ============================================================================
// Simple Hash Function (FNV-1a variant for determinism)
// ============================================================================

/// FNV-1a hash for deterministic, fast hashing
#[derive(Clone, Copy, Debug)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    const GOLDEN: u64 = 0x9e3779b97f4a7c15;

    /// Create a new hasher with default FNV offset basis.
    #[inline]
    pub const fn new() -> Self {
        Self {
            state: Self::FNV_OFFSET,
        }
    }

    /// Avalanche bit mixer (from MurmurHash3 finalizer).
    #[inline]
    fn mix(mut h: u64) -> u64 {
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51afd7ed558ccd);
        h ^= h >> 33;
        h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
        h ^= h >> 33;
        h
    }

    /// Hash a byte slice and return a mixed 64-bit digest.
    #[inline]
    pub fn hash_bytes(data: &[u8]) -> u64 {
        let mut hasher = Self::new();
        hasher.write(data);
        Self::mix(hasher.state)
    }

    /// Hash a byte slice under a seed.
    ///
    /// The seed is folded into the digest with a golden-ratio step before the
    /// final mix, so different seeds behave as independent hash functions.
    #[inline]
    pub fn hash_seeded(data: &[u8], seed: u64) -> u64 {
        let digest = Self::hash_bytes(data);
        Self::mix(digest.wrapping_add(seed.wrapping_mul(Self::GOLDEN)))
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::FNV_PRIME);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        Self::mix(self.state)
    }
}

// ============================================================================
// Item Hashers - (item, seed) -> column
// ============================================================================

/// Maps a normalized item to a column under a per-row seed.
///
/// Implementations must be pure: the same `(item, seed, max)` always yields
/// the same column in `[0, max)`. The never-undercount guarantee relies on
/// it.
pub trait ItemHasher {
    /// Column for `item` under `seed`, in `[0, max)`. `max` is never zero.
    fn column(&self, item: &str, seed: u64, max: usize) -> usize;
}

/// Default hasher: seeded FNV-1a with an avalanche finalizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FnvItemHasher;

impl ItemHasher for FnvItemHasher {
    #[inline]
    fn column(&self, item: &str, seed: u64, max: usize) -> usize {
        (FnvHasher::hash_seeded(item.as_bytes(), seed) % max as u64) as usize
    }
}

/// The blog widget's string hash: `h = (h << 5) - h + unit` over UTF-16
/// code units in 32-bit wrapping arithmetic, starting from the seed, then
/// `|h| mod max`.
///
/// Distribution is poor for long inputs, but using it reproduces the exact
/// cells the browser demo lights up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolynomialHasher;

impl ItemHasher for PolynomialHasher {
    fn column(&self, item: &str, seed: u64, max: usize) -> usize {
        let mut h = seed as i32;
        for unit in item.encode_utf16() {
            h = (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit));
        }
        (h.unsigned_abs() as usize) % max
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Shape and seeding of a [`CountMinSketch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SketchConfig {
    /// Number of hash rows (depth)
    pub rows: usize,
    /// Number of columns per row (width)
    pub cols: usize,
    /// Seed step between rows: `seed(r) = r * seed_multiplier`
    pub seed_multiplier: u64,
}

impl SketchConfig {
    /// Config with the given shape and the default seed step.
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            seed_multiplier: DEFAULT_SEED_MULTIPLIER,
        }
    }

    /// Check the shape is usable.
    pub fn validate(&self) -> Result<(), AlgoError> {
        if self.rows == 0 {
            return Err(AlgoError::InvalidConfiguration {
                reason: "rows must be > 0",
            });
        }
        if self.cols == 0 {
            return Err(AlgoError::InvalidConfiguration {
                reason: "cols must be > 0",
            });
        }
        match self.rows.checked_mul(self.cols) {
            Some(cells) if cells <= MAX_CELLS => Ok(()),
            _ => Err(AlgoError::InvalidConfiguration {
                reason: "rows * cols exceeds MAX_CELLS",
            }),
        }
    }
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize an item key: trim surrounding whitespace and lowercase.
///
/// Returns `None` when nothing is left, which every sketch operation treats
/// as a no-op.
pub fn normalize(item: &str) -> Option<String> {
    let key = item.trim().to_lowercase();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

// ============================================================================
// Count-Min Sketch
// ============================================================================

/// A probed `(row, column)` coordinate of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Row (hash function) index
    pub row: usize,
    /// Column index within the row
    pub col: usize,
}

/// Result of an inspected query: approximate and exact counts side by side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryReport {
    /// Normalized key (empty if the input normalized to nothing)
    pub item: String,
    /// Sketch estimate (minimum over probed cells)
    pub estimate: u64,
    /// Exact count from the ledger
    pub actual: u64,
    /// Cells that were probed, one per row
    pub cells: Vec<Cell>,
}

impl QueryReport {
    /// How far the estimate exceeds the true count.
    #[inline]
    pub fn overestimate(&self) -> u64 {
        self.estimate.saturating_sub(self.actual)
    }
}

impl fmt::Display for QueryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Estimated: {}, Actual: {}", self.estimate, self.actual)
    }
}

/// Count-Min Sketch for frequency estimation over string items.
#[derive(Clone, Debug)]
pub struct CountMinSketch<H = FnvItemHasher> {
    rows: usize,
    cols: usize,
    seed_multiplier: u64,
    seeds: Vec<u64>,
    /// Row-major `rows * cols` counters
    counters: Vec<u64>,
    ledger: BTreeMap<String, u64>,
    last_touched: Vec<Cell>,
    total: u64,
    hasher: H,
}

impl CountMinSketch<FnvItemHasher> {
    /// Create an empty 4 × 10 sketch with the default hasher.
    pub fn new() -> Self {
        Self::build(SketchConfig::default(), FnvItemHasher)
    }

    /// Create an empty sketch with the given shape and the default hasher.
    pub fn with_config(config: SketchConfig) -> Result<Self, AlgoError> {
        Self::with_hasher(config, FnvItemHasher)
    }
}

impl Default for CountMinSketch<FnvItemHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ItemHasher> CountMinSketch<H> {
    /// Create an empty sketch with a custom item hasher.
    pub fn with_hasher(config: SketchConfig, hasher: H) -> Result<Self, AlgoError> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    /// `config` must already be valid.
    fn build(config: SketchConfig, hasher: H) -> Self {
        let seeds = (0..config.rows)
            .map(|r| (r as u64).wrapping_mul(config.seed_multiplier))
            .collect();
        tracing::debug!(
            rows = config.rows,
            cols = config.cols,
            seed_multiplier = config.seed_multiplier,
            "count-min sketch created"
        );
        Self {
            rows: config.rows,
            cols: config.cols,
            seed_multiplier: config.seed_multiplier,
            seeds,
            counters: alloc::vec![0u64; config.rows * config.cols],
            ledger: BTreeMap::new(),
            last_touched: Vec::with_capacity(config.rows),
            total: 0,
            hasher,
        }
    }

    #[inline]
    fn column_for(&self, key: &str, row: usize) -> usize {
        self.hasher.column(key, self.seeds[row], self.cols)
    }

    #[inline]
    fn cells_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = Cell> + 'a {
        (0..self.rows).map(move |row| Cell {
            row,
            col: self.column_for(key, row),
        })
    }

    #[inline]
    fn counter(&self, cell: Cell) -> u64 {
        self.counters[cell.row * self.cols + cell.col]
    }

    #[inline]
    fn min_over(&self, key: &str) -> u64 {
        self.cells_for(key)
            .map(|cell| self.counter(cell))
            .min()
            .unwrap_or(0)
    }

    // ========================================================================
    // Stream operations
    // ========================================================================

    /// Insert one occurrence of `item`.
    ///
    /// Returns `false` (and changes nothing) if the item normalizes to an
    /// empty string.
    #[inline]
    pub fn insert(&mut self, item: &str) -> bool {
        self.insert_count(item, 1)
    }

    /// Insert `count` occurrences of `item` at once.
    ///
    /// A zero count is a no-op, like an empty item.
    pub fn insert_count(&mut self, item: &str, count: u64) -> bool {
        let Some(key) = normalize(item) else {
            return false;
        };
        if count == 0 {
            return false;
        }

        self.last_touched.clear();
        for row in 0..self.rows {
            let col = self.column_for(&key, row);
            let slot = &mut self.counters[row * self.cols + col];
            *slot = slot.saturating_add(count);
            self.last_touched.push(Cell { row, col });
        }
        self.total = self.total.saturating_add(count);

        tracing::trace!(item = %key, count, "sketch insert");
        let exact = self.ledger.entry(key).or_insert(0);
        *exact = exact.saturating_add(count);
        true
    }

    /// Estimate the frequency of `item` and highlight the probed cells.
    ///
    /// The estimate is never below the true insertion count. Empty items
    /// estimate to 0 and leave the highlight untouched.
    pub fn query(&mut self, item: &str) -> u64 {
        let Some(key) = normalize(item) else {
            return 0;
        };
        let cells: Vec<Cell> = self.cells_for(&key).collect();
        let estimate = cells.iter().map(|&c| self.counter(c)).min().unwrap_or(0);
        self.last_touched = cells;
        estimate
    }

    /// Estimate the frequency of `item` without touching highlight state.
    pub fn estimate(&self, item: &str) -> u64 {
        normalize(item).map_or(0, |key| self.min_over(&key))
    }

    /// Estimate many items at once (read-only).
    #[cfg(feature = "parallel")]
    pub fn estimate_batch(&self, items: &[&str]) -> Vec<u64>
    where
        H: Sync,
    {
        items.par_iter().map(|item| self.estimate(item)).collect()
    }

    /// Estimate many items at once (read-only).
    #[cfg(not(feature = "parallel"))]
    pub fn estimate_batch(&self, items: &[&str]) -> Vec<u64> {
        items.iter().map(|item| self.estimate(item)).collect()
    }

    /// Query `item` and pair the estimate with its exact ledger count.
    pub fn report(&mut self, item: &str) -> QueryReport {
        let estimate = self.query(item);
        let key = normalize(item).unwrap_or_default();
        let cells = if key.is_empty() {
            Vec::new()
        } else {
            self.last_touched.clone()
        };
        QueryReport {
            actual: self.ledger.get(&key).copied().unwrap_or(0),
            item: key,
            estimate,
            cells,
        }
    }

    /// Cells `item` maps to, one per row. Empty for empty items.
    pub fn probe(&self, item: &str) -> Vec<Cell> {
        normalize(item).map_or_else(Vec::new, |key| self.cells_for(&key).collect())
    }

    /// Exact number of times `item` was inserted.
    pub fn actual(&self, item: &str) -> u64 {
        normalize(item)
            .and_then(|key| self.ledger.get(&key).copied())
            .unwrap_or(0)
    }

    /// Zero every counter and forget the ledger and highlights.
    pub fn reset(&mut self) {
        tracing::debug!(total = self.total, "count-min sketch reset");
        self.counters.fill(0);
        self.ledger.clear();
        self.last_touched.clear();
        self.total = 0;
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of hash rows (depth).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (width).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Seed used by `row`, or `None` past the last row.
    #[inline]
    pub fn seed(&self, row: usize) -> Option<u64> {
        self.seeds.get(row).copied()
    }

    /// Shape of this sketch as a config.
    pub fn config(&self) -> SketchConfig {
        SketchConfig {
            rows: self.rows,
            cols: self.cols,
            seed_multiplier: self.seed_multiplier,
        }
    }

    /// Counters of one row, or `None` past the last row.
    #[inline]
    pub fn row(&self, row: usize) -> Option<&[u64]> {
        if row < self.rows {
            let start = row * self.cols;
            Some(&self.counters[start..start + self.cols])
        } else {
            None
        }
    }

    /// Counter at `(row, col)`, or `None` out of bounds.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<u64> {
        if row < self.rows && col < self.cols {
            Some(self.counters[row * self.cols + col])
        } else {
            None
        }
    }

    /// Iterate rows of the table top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u64]> {
        self.counters.chunks_exact(self.cols)
    }

    /// Cells probed by the most recent insert or query.
    #[inline]
    pub fn last_touched(&self) -> &[Cell] {
        &self.last_touched
    }

    /// Exact counts of every item seen, in key order.
    pub fn ledger(&self) -> impl Iterator<Item = (&str, u64)> {
        self.ledger.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of distinct items seen.
    #[inline]
    pub fn distinct(&self) -> usize {
        self.ledger.len()
    }

    /// Total count of all insertions.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Largest counter, floored at 1 (heatmap scale denominator).
    pub fn max_count(&self) -> u64 {
        self.counters.iter().copied().max().unwrap_or(0).max(1)
    }

    /// Theoretical error bound (ε = e / width).
    #[inline]
    pub fn error_bound(&self) -> f64 {
        core::f64::consts::E / (self.cols as f64)
    }

    /// Confidence level (1 − e^{−depth}).
    #[cfg(feature = "std")]
    #[inline]
    pub fn confidence(&self) -> f64 {
        1.0 - (-(self.rows as f64)).exp()
    }
}

impl<H: ItemHasher> Mergeable for CountMinSketch<H> {
    fn merge(&mut self, other: &Self) -> Result<(), AlgoError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(AlgoError::DimensionMismatch {
                expected: (self.rows, self.cols),
                found: (other.rows, other.cols),
            });
        }
        if self.seed_multiplier != other.seed_multiplier {
            return Err(AlgoError::SeedMismatch {
                expected: self.seed_multiplier,
                found: other.seed_multiplier,
            });
        }

        for (dst, &src) in self.counters.iter_mut().zip(other.counters.iter()) {
            *dst = dst.saturating_add(src);
        }
        for (key, &count) in &other.ledger {
            let exact = self.ledger.entry(key.clone()).or_insert(0);
            *exact = exact.saturating_add(count);
        }
        self.total = self.total.saturating_add(other.total);
        self.last_touched.clear();

        tracing::debug!(
            total = self.total,
            merged = other.total,
            "count-min sketches merged"
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
