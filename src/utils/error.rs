//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding a statistics stream
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed statistics record: {0:?}")]
    MalformedRecord(String),

    #[error("malformed call block: {0}")]
    MalformedCallBlock(String),
}

/// Errors that can occur while merging or summing statistics streams
///
/// Every variant is fatal for the operation that raised it. Statistics for a
/// single instrumented artifact must stay perfectly aligned, so a mismatched
/// record aborts the whole pass instead of being skipped.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("unsupported positions directive: {0:?}")]
    UnsupportedPositions(String),

    #[error("headers differ: {0:?}")]
    HeadersDiffer(String),

    #[error("missing events directive")]
    MissingEvents,

    #[error("instruction or line specifications differ: {0}")]
    PositionsDiffer(String),

    #[error("statistics differ in event counts: expected {expected}, found {found}")]
    EventCountMismatch { expected: usize, found: usize },

    #[error("files differ: {0:?}")]
    MarkersDiffer(String),

    #[error("multiple call descriptions for a single target: {0:?}")]
    CallConflict(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while writing the summary report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
