//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod merge;
pub mod sum;

// Re-export main command functions
pub use merge::{execute_merge, MergeArgs};
pub use sum::{execute_sum, SumArgs};
