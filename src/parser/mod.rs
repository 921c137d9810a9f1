//! Statistics stream parsing.
//!
//! This module handles:
//! - Line-oriented stream access with one-line pushback
//! - Parsing statistics records from their wire form
//! - Classifying body lines (source markers vs call directives)

pub mod reader;
pub mod record;

// Re-export main types
pub use reader::StatsReader;
pub use record::{is_call_line, is_marker_line, StatRecord};
