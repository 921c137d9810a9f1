//! Header reconciliation across statistics streams.
//!
//! Every stream opens with the same directives: a fixed `positions:` schema,
//! an `events:` declaration naming the tracked counters, free-form metadata
//! lines, and finally the `ob=` artifact line that starts the body. Merging
//! only makes sense when all streams agree on this header line for line.

use crate::parser::StatsReader;
use crate::utils::config::{EVENTS_DIRECTIVE, OBJECT_PREFIX, POSITIONS_DIRECTIVE, POSITIONS_SCHEMA};
use crate::utils::error::MergeError;
use log::debug;
use std::io::BufRead;

/// Reconciled header of a set of statistics streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header lines before the artifact marker, verbatim and in order
    pub lines: Vec<String>,
    /// Declared event names, in declaration order
    pub events: Vec<String>,
    /// Artifact path named by the first stream's `ob=` line
    pub artifact: String,
}

/// True when every element equals the first
///
/// **Private** - alignment predicate shared by header and body checks
pub(crate) fn all_equal<T: PartialEq>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0] == pair[1])
}

/// Consume the header from every stream in lock-step
///
/// Each round pulls one line from all streams and requires them to be
/// textually identical. The first stream drives interpretation; the loop
/// ends at the `ob=` artifact marker, which is consumed.
///
/// # Errors
/// * `MergeError::HeadersDiffer` - a round produced non-identical lines
/// * `MergeError::UnsupportedPositions` - a `positions:` directive other
///   than the fixed `instr line` schema
/// * `MergeError::MissingEvents` - no `events:` directive before `ob=`
/// * `MergeError::UnexpectedEof` - a stream ended before its `ob=` line
pub fn reconcile_headers<R: BufRead>(
    readers: &mut [StatsReader<R>],
) -> Result<Header, MergeError> {
    let mut events: Option<Vec<String>> = None;
    let mut lines = Vec::new();

    loop {
        let mut round = Vec::with_capacity(readers.len());
        for reader in readers.iter_mut() {
            match reader.next_line()? {
                Some(line) => round.push(line),
                None => return Err(MergeError::UnexpectedEof),
            }
        }
        let first = match round.first() {
            Some(line) => line,
            None => return Err(MergeError::UnexpectedEof),
        };

        if !all_equal(&round) {
            return Err(MergeError::HeadersDiffer(first.clone()));
        }

        if let Some(artifact) = first.strip_prefix(OBJECT_PREFIX) {
            let events = events.ok_or(MergeError::MissingEvents)?;
            debug!(
                "Reconciled header: {} lines, {} events, artifact {:?}",
                lines.len(),
                events.len(),
                artifact
            );
            return Ok(Header {
                lines,
                events,
                artifact: artifact.to_string(),
            });
        }

        if first.starts_with(POSITIONS_DIRECTIVE) {
            if first != POSITIONS_SCHEMA {
                return Err(MergeError::UnsupportedPositions(first.clone()));
            }
        } else if let Some(declared) = first.strip_prefix(EVENTS_DIRECTIVE) {
            events = Some(declared.split_whitespace().map(String::from).collect());
        }

        lines.push(first.clone());
    }
}
