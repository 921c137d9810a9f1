//! Istats Tools
//!
//! Lock-step merging and per-event summation of statistics files
//! produced by instrumented program runs.
//!
//! This crate provides the core implementation for the
//! `istats` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install istats-tools
//! istats --help
//! ```

pub mod commands;
pub mod merge;
pub mod output;
pub mod parser;
pub mod summary;
pub mod utils;
