//! Per-file totals and cross-file aggregation.
//!
//! The degenerate single-stream case of the merge model: no cross-stream
//! alignment, just a header parse followed by a running per-event total.

pub mod totals;

// Re-export main types and functions
pub use totals::{sum_file, sum_stream, Aggregate, EventTotal, FileTotals, StreamTotals};
