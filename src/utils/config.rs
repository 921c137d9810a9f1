//! Configuration and constants for the statistics format and CLI defaults.

/// The only positions schema this tool accepts
pub const POSITIONS_SCHEMA: &str = "positions: instr line";

/// Current summary report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

// Directive prefixes of the statistics grammar. A stream starts with header
// directives, switches to the body at the `ob=` line, and the body mixes
// source markers, statistics records, and call blocks.
pub const POSITIONS_DIRECTIVE: &str = "positions:";
pub const EVENTS_DIRECTIVE: &str = "events:";
pub const OBJECT_PREFIX: &str = "ob=";
pub const FILE_PREFIX: &str = "fl=";
pub const FUNCTION_PREFIX: &str = "fn=";
pub const CALL_FILE_PREFIX: &str = "cfl=";
pub const CALL_FUNCTION_PREFIX: &str = "cfn=";
pub const CALL_TARGET_PREFIX: &str = "calls=";

// Event names with boolean semantics. Covered flags combine by max (any run
// saw it), uncovered flags combine by min (every run missed it). Everything
// else is an additive counter.
pub const COVERED_EVENTS: &[&str] = &["Icov"];
pub const UNCOVERED_EVENTS: &[&str] = &["Iuncov"];

/// Statistics file name expected inside each run directory
pub const DEFAULT_STATS_FILENAME: &str = "run.istats";

/// Instrumented-artifact file name expected inside each run directory
pub const DEFAULT_ARTIFACT_FILENAME: &str = "assembly.ll";
