//! Call block collection and merging.
//!
//! A statistics record may be followed by call blocks attributing counters
//! to specific call targets:
//!
//! ```text
//! cfl=<file>        (optional, only when the callee lives in another file)
//! cfn=<function>
//! calls=<target descriptor>
//! <instr> <line> <v_1> ... <v_k>
//! ```
//!
//! After every merged record, each stream is drained of its trailing call
//! blocks, and the collected edges are grouped by target descriptor across
//! all streams. Edges sharing a target merge their statistics with the same
//! reduction as ordinary records and must agree on their `cfl=`/`cfn=`
//! descriptor lines.

use crate::merge::reduction::{merge_records, EventPolicy};
use crate::parser::{StatRecord, StatsReader};
use crate::utils::config::{CALL_FILE_PREFIX, CALL_FUNCTION_PREFIX, CALL_TARGET_PREFIX};
use crate::utils::error::{MergeError, ParseError};
use std::io::BufRead;

/// One call edge attributing statistics to a call target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEdge {
    /// Verbatim `cfl=` line, when the callee lives in another source file
    pub site: Option<String>,
    /// Verbatim `cfn=` line
    pub function: String,
    /// Payload of the `calls=` line, the edge's identity key
    pub target: String,
    /// Statistics attributed to this edge
    pub record: StatRecord,
}

/// Read the next line and require a fixed directive prefix
///
/// **Private** - call block grammar helper
fn expect_directive<R: BufRead>(
    reader: &mut StatsReader<R>,
    prefix: &str,
) -> Result<String, MergeError> {
    match reader.next_line()? {
        Some(line) if line.starts_with(prefix) => Ok(line),
        Some(line) => Err(ParseError::MalformedCallBlock(format!(
            "expected {} directive, found {:?}",
            prefix, line
        ))
        .into()),
        None => Err(MergeError::UnexpectedEof),
    }
}

/// Drain every call block immediately following the current record
///
/// Stops at the first line that does not open a call block and pushes that
/// line back so normal record processing resumes. Reaching the end of the
/// stream while scanning for the next block is fine; ending inside a block
/// is not.
pub(crate) fn drain_call_edges<R: BufRead>(
    reader: &mut StatsReader<R>,
) -> Result<Vec<CallEdge>, MergeError> {
    let mut edges = Vec::new();

    loop {
        let first = match reader.next_line()? {
            Some(line) => line,
            None => break,
        };
        let opens_block =
            first.starts_with(CALL_FILE_PREFIX) || first.starts_with(CALL_FUNCTION_PREFIX);
        if !opens_block {
            reader.push_back(first);
            break;
        }

        let (site, function) = if first.starts_with(CALL_FILE_PREFIX) {
            let function = expect_directive(reader, CALL_FUNCTION_PREFIX)?;
            (Some(first), function)
        } else {
            (None, first)
        };
        let target_line = expect_directive(reader, CALL_TARGET_PREFIX)?;
        let target = target_line[CALL_TARGET_PREFIX.len()..].to_string();

        let record = match reader.next_line()? {
            Some(line) => StatRecord::parse(&line)?,
            None => return Err(MergeError::UnexpectedEof),
        };

        edges.push(CallEdge {
            site,
            function,
            target,
            record,
        });
    }

    Ok(edges)
}

/// Drain and merge the call blocks trailing the current record
///
/// **Public** - invoked by the merge driver after every merged record
///
/// Edges are grouped by target descriptor in first-appearance order across
/// all streams, which makes the output deterministic for a given input
/// ordering. Statistics within a group merge under `policy`.
///
/// # Errors
/// * `MergeError::CallConflict` - edges sharing a target disagree on their
///   `cfl=`/`cfn=` descriptors
/// * plus everything `merge_records` and the block grammar can raise
pub fn merge_call_edges<R: BufRead>(
    readers: &mut [StatsReader<R>],
    policy: &EventPolicy,
) -> Result<Vec<CallEdge>, MergeError> {
    // Head edge per target plus any further records to fold into it.
    let mut groups: Vec<(CallEdge, Vec<StatRecord>)> = Vec::new();

    for reader in readers.iter_mut() {
        for edge in drain_call_edges(reader)? {
            let existing = groups
                .iter()
                .position(|(head, _)| head.target == edge.target);
            match existing {
                Some(index) => {
                    let (head, extra) = &mut groups[index];
                    if edge.site != head.site || edge.function != head.function {
                        return Err(MergeError::CallConflict(edge.target));
                    }
                    extra.push(edge.record);
                }
                None => groups.push((edge, Vec::new())),
            }
        }
    }

    let mut merged = Vec::with_capacity(groups.len());
    for (head, extra) in groups {
        let CallEdge {
            site,
            function,
            target,
            record,
        } = head;
        let mut records = vec![record];
        records.extend(extra);
        let record = merge_records(&records, policy)?;
        merged.push(CallEdge {
            site,
            function,
            target,
            record,
        });
    }

    Ok(merged)
}
