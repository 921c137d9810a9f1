//! Tests of single-stream summation and the cross-file aggregate.

use istats_tools::parser::StatsReader;
use istats_tools::summary::{sum_stream, Aggregate, EventTotal, StreamTotals};
use istats_tools::utils::error::{MergeError, ParseError};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn sum(input: &str) -> Result<StreamTotals, MergeError> {
    let mut reader = StatsReader::new(Cursor::new(input.as_bytes().to_vec()));
    sum_stream(&mut reader)
}

fn stream(events: &str, body: &str) -> String {
    format!(
        "positions: instr line\nevents: {}\nob=/build/prog.bc\n{}",
        events, body
    )
}

#[test]
fn test_sum_single_event() {
    let totals = sum(&stream("Ir", "fn=main\n0 1 2\n0 2 3\n")).unwrap();

    assert_eq!(totals.events, vec!["Ir".to_string()]);
    assert_eq!(totals.totals, vec![5]);
    assert_eq!(totals.records, 2);
}

#[test]
fn test_sum_is_column_wise() {
    let totals = sum(&stream(
        "Icov Iuncov Ir",
        "fn=main\n0 1 1 0 10\n1 2 0 1 20\n2 3 1 0 30\n",
    ))
    .unwrap();

    assert_eq!(totals.totals, vec![2, 1, 60]);
    assert_eq!(totals.records, 3);
}

#[test]
fn test_sum_applies_plain_sum_to_boolean_events() {
    // Each position contributes at most one to a coverage flag, so the flat
    // total is the number of covered positions rather than a merged flag.
    let totals = sum(&stream("Icov", "fn=main\n0 1 1\n1 2 1\n2 3 0\n")).unwrap();

    assert_eq!(totals.totals, vec![2]);
}

#[test]
fn test_sum_counts_markers() {
    let totals = sum(&stream(
        "Ir",
        "fn=main\nfl=src/main.c\n0 1 2\nfn=helper\n5 2 3\n",
    ))
    .unwrap();

    assert_eq!(totals.functions, 2);
    assert_eq!(totals.source_files, 1);
    assert_eq!(totals.records, 2);
}

#[test]
fn test_sum_skips_call_edges() {
    let totals = sum(&stream(
        "Ir",
        "fn=main\n0 1 2\ncfl=src/other.c\ncfn=foo\ncalls=1 5 2\n0 1 100\n0 2 3\n",
    ))
    .unwrap();

    // The call block's 100 must not leak into the flat total.
    assert_eq!(totals.totals, vec![5]);
    assert_eq!(totals.call_edges, 1);
    assert_eq!(totals.records, 2);
}

#[test]
fn test_sum_saturates() {
    let body = format!("fn=main\n0 1 {}\n0 2 5\n", u64::MAX);
    let totals = sum(&stream("Ir", &body)).unwrap();

    assert_eq!(totals.totals, vec![u64::MAX]);
}

#[test]
fn test_sum_requires_events_directive() {
    let err = sum("positions: instr line\nob=/build/prog.bc\n0 1 2\n").unwrap_err();

    assert!(matches!(err, MergeError::MissingEvents));
}

#[test]
fn test_sum_rejects_wrong_event_count() {
    let err = sum(&stream("Icov Ir", "fn=main\n0 1 2\n")).unwrap_err();

    assert!(matches!(
        err,
        MergeError::EventCountMismatch {
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn test_sum_rejects_call_directive_out_of_place() {
    let err = sum(&stream("Ir", "calls=1 5 2\n0 1 3\n")).unwrap_err();

    assert!(matches!(
        err,
        MergeError::Parse(ParseError::MalformedCallBlock(_))
    ));
}

#[test]
fn test_aggregate_averages_use_integer_division() {
    let mut aggregate = Aggregate::new();
    aggregate.add(&sum(&stream("Ir", "fn=main\n0 1 5\n")).unwrap());
    aggregate.add(&sum(&stream("Ir", "fn=main\n0 1 10\n")).unwrap());

    let per_event: Vec<(&str, &EventTotal)> = aggregate.per_event().collect();
    assert_eq!(per_event.len(), 1);

    let (name, total) = per_event[0];
    assert_eq!(name, "Ir");
    assert_eq!(total.total, 15);
    assert_eq!(total.files, 2);
    assert_eq!(total.average(), 7);
    assert_eq!(aggregate.file_count(), 2);
}

#[test]
fn test_aggregate_tracks_events_per_contributing_file() {
    // Files may declare different event lists; each event averages over the
    // files that actually declared it.
    let mut aggregate = Aggregate::new();
    aggregate.add(&sum(&stream("Ir", "fn=main\n0 1 6\n")).unwrap());
    aggregate.add(&sum(&stream("Icov Ir", "fn=main\n0 1 1 4\n")).unwrap());

    let per_event: Vec<(&str, &EventTotal)> = aggregate.per_event().collect();

    // Ordered by event name.
    assert_eq!(per_event[0].0, "Icov");
    assert_eq!(per_event[0].1.files, 1);
    assert_eq!(per_event[0].1.total, 1);
    assert_eq!(per_event[1].0, "Ir");
    assert_eq!(per_event[1].1.files, 2);
    assert_eq!(per_event[1].1.total, 10);
    assert_eq!(per_event[1].1.average(), 5);
}

#[test]
fn test_empty_event_total_average_is_zero() {
    assert_eq!(EventTotal::default().average(), 0);
}

#[test]
fn test_sum_of_empty_body() {
    let totals = sum(&stream("Icov Ir", "")).unwrap();

    assert_eq!(totals.totals, vec![0, 0]);
    assert_eq!(totals.records, 0);
}
