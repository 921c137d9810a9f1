//! Output writers for summation reports.
//!
//! The merged statistics stream itself is written by the merge driver; this
//! module only covers the JSON report produced by the `sum` command.

pub mod report;

// Re-export main types and functions
pub use report::{read_report, write_report, EventAggregate, FileSummary, SumReport};
