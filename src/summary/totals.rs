//! Single-stream summation and the multi-file aggregate.

use crate::merge::calls::drain_call_edges;
use crate::merge::header::reconcile_headers;
use crate::merge::reduction::EventPolicy;
use crate::parser::{is_call_line, is_marker_line, StatRecord, StatsReader};
use crate::utils::config::FILE_PREFIX;
use crate::utils::error::{MergeError, ParseError};
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Per-event totals of one statistics stream
///
/// Totals are plain sums for every event kind. A covered-flag total is
/// therefore the number of covered positions in the stream, not a merged
/// flag, since each position contributes at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTotals {
    /// Declared event names, in declaration order
    pub events: Vec<String>,
    /// One total per declared event, index-aligned with `events`
    pub totals: Vec<u64>,
    /// Statistics records seen
    pub records: u64,
    /// Call edges skipped (they do not contribute to the totals)
    pub call_edges: u64,
    /// `fl=` markers seen
    pub source_files: u64,
    /// `fn=` markers seen
    pub functions: u64,
}

/// Totals of one statistics file on disk
#[derive(Debug, Clone)]
pub struct FileTotals {
    pub path: PathBuf,
    pub totals: StreamTotals,
}

/// Sum every statistics record of one stream
///
/// **Public** - core of the `sum` command
///
/// # Errors
/// Header failures mirror the merge path; body failures are limited to
/// malformed records, call blocks out of place, and event count mismatches.
pub fn sum_stream<R: BufRead>(reader: &mut StatsReader<R>) -> Result<StreamTotals, MergeError> {
    let header = reconcile_headers(std::slice::from_mut(reader))?;
    let policy = EventPolicy::from_events(&header.events);

    let mut result = StreamTotals {
        totals: vec![0; policy.event_count()],
        events: header.events,
        records: 0,
        call_edges: 0,
        source_files: 0,
        functions: 0,
    };

    loop {
        let line = match reader.next_line()? {
            Some(line) => line,
            None => break,
        };

        if is_marker_line(&line) {
            if line.starts_with(FILE_PREFIX) {
                result.source_files += 1;
            } else {
                result.functions += 1;
            }
            continue;
        }
        if is_call_line(&line) {
            return Err(ParseError::MalformedCallBlock(format!(
                "call directive without a preceding statistics record: {:?}",
                line
            ))
            .into());
        }

        let record = StatRecord::parse(&line)?;
        if record.values.len() != policy.event_count() {
            return Err(MergeError::EventCountMismatch {
                expected: policy.event_count(),
                found: record.values.len(),
            });
        }
        for (total, value) in result.totals.iter_mut().zip(&record.values) {
            *total = total.saturating_add(*value);
        }
        result.records += 1;

        // Call blocks are skipped, the flat total only covers records.
        result.call_edges += drain_call_edges(reader)?.len() as u64;
    }

    debug!(
        "Summed {} records over {} events",
        result.records,
        result.events.len()
    );
    Ok(result)
}

/// Sum one statistics file on disk
pub fn sum_file(path: &Path) -> Result<FileTotals, MergeError> {
    let file = File::open(path)?;
    let mut reader = StatsReader::new(BufReader::new(file));
    let totals = sum_stream(&mut reader)?;
    Ok(FileTotals {
        path: path.to_path_buf(),
        totals,
    })
}

/// Running totals of one event across contributing files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTotal {
    /// Grand total across all contributing files
    pub total: u64,
    /// Number of files that declared this event
    pub files: u64,
}

impl EventTotal {
    /// Per-file average, using integer division
    pub fn average(&self) -> u64 {
        if self.files == 0 {
            0
        } else {
            self.total / self.files
        }
    }
}

/// Cross-file aggregate of per-event totals
///
/// Files may declare different event lists; each event is averaged over the
/// files that actually declared it. Iteration is ordered by event name.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    events: BTreeMap<String, EventTotal>,
    files: u64,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one stream's totals into the aggregate
    pub fn add(&mut self, totals: &StreamTotals) {
        for (name, value) in totals.events.iter().zip(&totals.totals) {
            let entry = self.events.entry(name.clone()).or_default();
            entry.total = entry.total.saturating_add(*value);
            entry.files += 1;
        }
        self.files += 1;
    }

    /// Number of files folded in so far
    pub fn file_count(&self) -> u64 {
        self.files
    }

    /// Per-event totals, ordered by event name
    pub fn per_event(&self) -> impl Iterator<Item = (&str, &EventTotal)> {
        self.events
            .iter()
            .map(|(name, total)| (name.as_str(), total))
    }
}
