//! Event classification and record reduction.
//!
//! Events fall into three kinds. Covered flags reduce by max (nonzero iff
//! any run observed coverage), uncovered flags reduce by min (nonzero iff
//! every run missed it), and everything else is an additive counter reduced
//! by saturating sum. Classification depends only on the event name and is
//! computed once per merge, then reused for every record.

use crate::parser::StatRecord;
use crate::utils::config::{COVERED_EVENTS, UNCOVERED_EVENTS};
use crate::utils::error::MergeError;

/// Reduction kind of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Boolean coverage flag, reduced by max
    Covered,
    /// Boolean non-coverage flag, reduced by min
    Uncovered,
    /// Additive counter, reduced by sum
    Additive,
}

impl EventKind {
    /// Classify an event by name
    pub fn classify(name: &str) -> Self {
        if COVERED_EVENTS.contains(&name) {
            EventKind::Covered
        } else if UNCOVERED_EVENTS.contains(&name) {
            EventKind::Uncovered
        } else {
            EventKind::Additive
        }
    }

    /// Reduce one event's values across all streams
    pub fn reduce(self, values: impl Iterator<Item = u64>) -> u64 {
        match self {
            EventKind::Covered => values.max().unwrap_or(0),
            EventKind::Uncovered => values.min().unwrap_or(0),
            EventKind::Additive => values.fold(0, u64::saturating_add),
        }
    }
}

/// Per-merge reduction policy derived from the event declaration
#[derive(Debug, Clone)]
pub struct EventPolicy {
    names: Vec<String>,
    kinds: Vec<EventKind>,
}

impl EventPolicy {
    /// Build the policy from declared event names
    pub fn from_events(names: &[String]) -> Self {
        let kinds = names.iter().map(|name| EventKind::classify(name)).collect();
        Self {
            names: names.to_vec(),
            kinds,
        }
    }

    /// Declared event names, in declaration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of declared events
    pub fn event_count(&self) -> usize {
        self.names.len()
    }

    /// Reduction kinds, index-aligned with `names`
    pub fn kinds(&self) -> &[EventKind] {
        &self.kinds
    }
}

/// Merge one aligned group of records into a single record
///
/// **Public** - shared by the body loop and the call block merger
///
/// # Arguments
/// * `records` - one record per stream, all describing the same position
/// * `policy` - reduction policy for the declared events
///
/// # Errors
/// * `MergeError::PositionsDiffer` - records disagree on `(instr, line)`
/// * `MergeError::EventCountMismatch` - a record's value count does not
///   match the event declaration
pub fn merge_records(
    records: &[StatRecord],
    policy: &EventPolicy,
) -> Result<StatRecord, MergeError> {
    let (first, rest) = match records.split_first() {
        Some(split) => split,
        None => return Err(MergeError::UnexpectedEof),
    };

    for record in rest {
        if record.position() != first.position() {
            return Err(MergeError::PositionsDiffer(format!(
                "{}:{} vs {}:{}",
                first.instr, first.line, record.instr, record.line
            )));
        }
    }
    for record in records {
        if record.values.len() != policy.event_count() {
            return Err(MergeError::EventCountMismatch {
                expected: policy.event_count(),
                found: record.values.len(),
            });
        }
    }

    let values = policy
        .kinds()
        .iter()
        .enumerate()
        .map(|(index, kind)| kind.reduce(records.iter().map(|record| record.values[index])))
        .collect();

    Ok(StatRecord {
        instr: first.instr,
        line: first.line,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(names: &[&str]) -> EventPolicy {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        EventPolicy::from_events(&names)
    }

    fn record(instr: u64, line: u64, values: &[u64]) -> StatRecord {
        StatRecord {
            instr,
            line,
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(EventKind::classify("Icov"), EventKind::Covered);
        assert_eq!(EventKind::classify("Iuncov"), EventKind::Uncovered);
        assert_eq!(EventKind::classify("Ir"), EventKind::Additive);
        assert_eq!(EventKind::classify("Queries"), EventKind::Additive);
    }

    #[test]
    fn test_covered_reduces_by_max() {
        let merged = merge_records(
            &[record(0, 10, &[1]), record(0, 10, &[0])],
            &policy(&["Icov"]),
        )
        .unwrap();
        assert_eq!(merged, record(0, 10, &[1]));
    }

    #[test]
    fn test_uncovered_reduces_by_min() {
        let merged = merge_records(
            &[record(0, 10, &[0]), record(0, 10, &[1])],
            &policy(&["Iuncov"]),
        )
        .unwrap();
        assert_eq!(merged, record(0, 10, &[0]));
    }

    #[test]
    fn test_additive_reduces_by_sum() {
        let merged = merge_records(
            &[record(0, 10, &[5]), record(0, 10, &[7])],
            &policy(&["Ir"]),
        )
        .unwrap();
        assert_eq!(merged, record(0, 10, &[12]));
    }

    #[test]
    fn test_sum_saturates() {
        let merged = merge_records(
            &[record(0, 10, &[u64::MAX]), record(0, 10, &[1])],
            &policy(&["Ir"]),
        )
        .unwrap();
        assert_eq!(merged.values, vec![u64::MAX]);
    }

    #[test]
    fn test_mixed_events_reduce_independently() {
        let merged = merge_records(
            &[record(4, 2, &[1, 0, 3]), record(4, 2, &[0, 1, 4])],
            &policy(&["Icov", "Iuncov", "Ir"]),
        )
        .unwrap();
        assert_eq!(merged, record(4, 2, &[1, 0, 7]));
    }

    #[test]
    fn test_singleton_is_identity() {
        let single = record(7, 3, &[2, 9]);
        let merged = merge_records(&[single.clone()], &policy(&["Icov", "Ir"])).unwrap();
        assert_eq!(merged, single);
    }

    #[test]
    fn test_position_mismatch_is_fatal() {
        let err = merge_records(
            &[record(0, 10, &[1]), record(0, 11, &[1])],
            &policy(&["Ir"]),
        )
        .unwrap_err();
        assert!(matches!(err, MergeError::PositionsDiffer(_)));
    }

    #[test]
    fn test_event_count_mismatch_is_fatal() {
        let err = merge_records(
            &[record(0, 10, &[1, 2]), record(0, 10, &[1])],
            &policy(&["Icov", "Ir"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MergeError::EventCountMismatch {
                expected: 2,
                found: 1
            }
        ));
    }
}
