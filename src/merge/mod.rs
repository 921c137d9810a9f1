//! Lock-step merging of statistics streams.
//!
//! This module transforms N aligned statistics streams into one:
//! - Header reconciliation (identical directives, shared event list)
//! - Event-kind-aware reduction of per-position counters
//! - Call block grouping and merging keyed by call target
//! - The driver that walks all streams and writes the combined output

pub mod calls;
pub mod driver;
pub mod header;
pub mod reduction;

// Re-export main types and functions
pub use calls::{merge_call_edges, CallEdge};
pub use driver::{merge_streams, MergeSummary};
pub use header::{reconcile_headers, Header};
pub use reduction::{merge_records, EventKind, EventPolicy};
