//! WebAssembly Bindings for ALICE-AlgoViz
//!
//! Browser-side sketch and trace cores via wasm-bindgen. The page owns the
//! timers, canvas and buttons; these wrappers only hold state and hand back
//! flat arrays that map onto JS typed arrays.
//!
//! | Widget            | Wrapper               | Core                    |
//! |-------------------|-----------------------|-------------------------|
//! | Count-Min Sketch  | `WasmCountMinSketch`  | `sketch::CountMinSketch` |
//! | Merge Sort        | `WasmMergeTrace`      | `trace::Trace<f64>`      |

use wasm_bindgen::prelude::*;

use crate::error::AlgoError;
use crate::sketch::{CountMinSketch, PolynomialHasher, SketchConfig};
use crate::trace::{Trace, TraceConfig, TraceOrder};

fn to_js(err: AlgoError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ============================================================================
// WasmCountMinSketch
// ============================================================================

/// Count-Min Sketch using the widget's string hash, so probed cells match
/// what the page has always drawn.
#[wasm_bindgen]
pub struct WasmCountMinSketch {
    inner: CountMinSketch<PolynomialHasher>,
}

#[wasm_bindgen]
impl WasmCountMinSketch {
    /// Create an empty `rows × cols` sketch.
    #[wasm_bindgen(constructor)]
    pub fn new(rows: usize, cols: usize) -> Result<WasmCountMinSketch, JsValue> {
        let inner =
            CountMinSketch::with_hasher(SketchConfig::new(rows, cols), PolynomialHasher)
                .map_err(to_js)?;
        Ok(Self { inner })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.inner.cols()
    }

    /// Insert one occurrence. Returns false for blank input.
    pub fn insert(&mut self, item: &str) -> bool {
        self.inner.insert(item)
    }

    /// Estimate and highlight the probed cells.
    pub fn query(&mut self, item: &str) -> f64 {
        self.inner.query(item) as f64
    }

    /// Exact count from the ledger.
    pub fn actual(&self, item: &str) -> f64 {
        self.inner.actual(item) as f64
    }

    /// "Estimated: X, Actual: Y" for `item`.
    #[wasm_bindgen(js_name = "queryReport")]
    pub fn query_report(&mut self, item: &str) -> String {
        self.inner.report(item).to_string()
    }

    /// Clear table, ledger and highlights.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Table as flat Float64Array, row-major (`rows * cols`).
    #[wasm_bindgen(js_name = "getTable")]
    pub fn get_table(&self) -> Vec<f64> {
        self.inner
            .iter_rows()
            .flat_map(|row| row.iter().map(|&c| c as f64))
            .collect()
    }

    /// Last probed cells as flat Uint32Array `[row, col, row, col, ...]`.
    #[wasm_bindgen(js_name = "getLastTouched")]
    pub fn get_last_touched(&self) -> Vec<u32> {
        self.inner
            .last_touched()
            .iter()
            .flat_map(|cell| [cell.row as u32, cell.col as u32])
            .collect()
    }

    /// Largest counter (at least 1) for heatmap scaling.
    #[wasm_bindgen(js_name = "maxCount")]
    pub fn max_count(&self) -> f64 {
        self.inner.max_count() as f64
    }

    /// Total insertions.
    pub fn total(&self) -> f64 {
        self.inner.total() as f64
    }
}

// ============================================================================
// WasmMergeTrace
// ============================================================================

/// Immutable merge sort trace with per-step getters.
///
/// Out-of-range step indices return empty arrays / empty strings.
#[wasm_bindgen]
pub struct WasmMergeTrace {
    inner: Trace<f64>,
}

#[wasm_bindgen]
impl WasmMergeTrace {
    /// Trace `values`. `divideFirst` selects the tree view's two-pass order.
    ///
    /// Inputs longer than `maxLen` are rejected; pass 0 for the default
    /// limit.
    #[wasm_bindgen(constructor)]
    pub fn new(
        values: Vec<f64>,
        divide_first: bool,
        max_len: usize,
    ) -> Result<WasmMergeTrace, JsValue> {
        let order = if divide_first {
            TraceOrder::DivideFirst
        } else {
            TraceOrder::Interleaved
        };
        let mut config = TraceConfig::with_order(order);
        if max_len > 0 {
            config.max_len = max_len;
        }
        let inner = Trace::with_config(&values, config).map_err(to_js)?;
        Ok(Self { inner })
    }

    /// Number of steps.
    #[wasm_bindgen(js_name = "stepCount")]
    pub fn step_count(&self) -> usize {
        self.inner.len()
    }

    /// Kind tag of step `i` (`"divide"`, `"compare"`, ...).
    pub fn kind(&self, i: usize) -> String {
        self.inner
            .get(i)
            .map_or_else(String::new, |s| s.kind().as_str().to_owned())
    }

    /// Message of step `i`.
    pub fn message(&self, i: usize) -> String {
        self.inner
            .get(i)
            .map_or_else(String::new, |s| s.message().to_owned())
    }

    /// Full-array snapshot after step `i`.
    pub fn array(&self, i: usize) -> Vec<f64> {
        self.inner.get(i).map_or_else(Vec::new, |s| s.array().to_vec())
    }

    /// Node-local snapshot of step `i`.
    pub fn node(&self, i: usize) -> Vec<f64> {
        self.inner.get(i).map_or_else(Vec::new, |s| s.node().to_vec())
    }

    /// Active range of step `i` as `[start, end]`, empty if none.
    pub fn active(&self, i: usize) -> Vec<u32> {
        self.inner
            .get(i)
            .and_then(|s| s.active())
            .map_or_else(Vec::new, |span| {
                vec![span.start as u32, span.end as u32]
            })
    }

    /// Compared indices of step `i` as `[left, right]`, empty if none.
    pub fn comparing(&self, i: usize) -> Vec<u32> {
        self.inner
            .get(i)
            .and_then(|s| s.comparing())
            .map_or_else(Vec::new, |(l, r)| vec![l as u32, r as u32])
    }

    /// Index written by step `i`, or -1.
    pub fn merging(&self, i: usize) -> i32 {
        self.inner
            .get(i)
            .and_then(|s| s.merging())
            .map_or(-1, |t| t as i32)
    }

    /// Working array after the first `cursor` steps.
    #[wasm_bindgen(js_name = "replayTo")]
    pub fn replay_to(&self, cursor: usize) -> Vec<f64> {
        self.inner.replay_to(cursor)
    }

    /// Total comparisons.
    pub fn comparisons(&self) -> usize {
        self.inner.comparisons()
    }

    /// Total completed merges.
    pub fn merges(&self) -> usize {
        self.inner.merges()
    }
}
