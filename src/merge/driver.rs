//! The merge driver: header reconciliation, then the lock-step body walk.

use crate::merge::calls::merge_call_edges;
use crate::merge::header::{all_equal, reconcile_headers};
use crate::merge::reduction::{merge_records, EventPolicy};
use crate::parser::{is_call_line, is_marker_line, StatRecord, StatsReader};
use crate::utils::config::{CALL_TARGET_PREFIX, FILE_PREFIX, OBJECT_PREFIX};
use crate::utils::error::{MergeError, ParseError};
use log::debug;
use std::io::{BufRead, Write};

/// Counters describing one completed merge pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Declared event names shared by all inputs
    pub events: Vec<String>,
    /// Statistics records merged
    pub records: u64,
    /// Call edges written after grouping
    pub call_edges: u64,
    /// `fl=` markers passed through
    pub source_files: u64,
    /// `fn=` markers passed through
    pub functions: u64,
}

/// Merge N statistics streams into one output stream
///
/// **Public** - the core merge entry point
///
/// Headers are reconciled first and written through verbatim, with the
/// artifact line rewritten to `artifact_path`. The body is then walked in
/// lock-step: one line per stream per round, with the first stream driving
/// interpretation. Markers pass through, records merge under the event
/// policy, and trailing call blocks merge grouped by target.
///
/// # Arguments
/// * `readers` - one reader per input stream, positioned at the start
/// * `output` - destination for the combined stream
/// * `artifact_path` - path written into the output's `ob=` line
///
/// # Errors
/// Any alignment, schema, call graph, or I/O failure aborts the pass; the
/// output written so far must be discarded by the caller.
pub fn merge_streams<R: BufRead, W: Write>(
    readers: &mut [StatsReader<R>],
    output: &mut W,
    artifact_path: &str,
) -> Result<MergeSummary, MergeError> {
    let header = reconcile_headers(readers)?;
    for line in &header.lines {
        writeln!(output, "{}", line)?;
    }
    writeln!(output, "{}{}", OBJECT_PREFIX, artifact_path)?;

    let policy = EventPolicy::from_events(&header.events);
    let mut summary = MergeSummary {
        events: header.events,
        ..MergeSummary::default()
    };

    loop {
        let mut round = Vec::with_capacity(readers.len());
        for reader in readers.iter_mut() {
            round.push(reader.next_line()?);
        }
        let first = match round.first() {
            Some(slot) => slot,
            None => break,
        };

        match first {
            // All streams must run out in the same round.
            None => {
                if !all_equal(&round) {
                    return Err(MergeError::UnexpectedEof);
                }
                break;
            }
            Some(line) if is_marker_line(line) => {
                if !all_equal(&round) {
                    return Err(MergeError::MarkersDiffer(line.clone()));
                }
                writeln!(output, "{}", line)?;
                if line.starts_with(FILE_PREFIX) {
                    summary.source_files += 1;
                } else {
                    summary.functions += 1;
                }
            }
            Some(line) if is_call_line(line) => {
                return Err(ParseError::MalformedCallBlock(format!(
                    "call directive without a preceding statistics record: {:?}",
                    line
                ))
                .into());
            }
            Some(_) => {
                let mut records = Vec::with_capacity(round.len());
                for slot in &round {
                    let text = slot.as_deref().ok_or(MergeError::UnexpectedEof)?;
                    records.push(StatRecord::parse(text)?);
                }
                let merged = merge_records(&records, &policy)?;
                writeln!(output, "{}", merged)?;
                summary.records += 1;

                for edge in merge_call_edges(readers, &policy)? {
                    if let Some(site) = &edge.site {
                        writeln!(output, "{}", site)?;
                    }
                    writeln!(output, "{}", edge.function)?;
                    writeln!(output, "{}{}", CALL_TARGET_PREFIX, edge.target)?;
                    writeln!(output, "{}", edge.record)?;
                    summary.call_edges += 1;
                }
            }
        }
    }

    debug!(
        "Merged {} records and {} call edges across {} functions",
        summary.records, summary.call_edges, summary.functions
    );
    Ok(summary)
}
