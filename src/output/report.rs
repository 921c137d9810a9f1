//! JSON report writer for the `sum` command.

use crate::summary::{Aggregate, FileTotals};
use crate::utils::config::REPORT_SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Machine-readable result of one `sum` invocation
///
/// Maps are ordered by key so the serialized report is byte-stable for a
/// given input set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SumReport {
    pub schema_version: String,
    pub generated_at: String,
    pub files: Vec<FileSummary>,
    pub aggregate: BTreeMap<String, EventAggregate>,
}

/// Totals of one input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: String,
    pub records: u64,
    pub call_edges: u64,
    pub totals: BTreeMap<String, u64>,
}

/// Aggregate of one event across contributing files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAggregate {
    pub total: u64,
    pub files: u64,
    pub average: u64,
}

impl SumReport {
    /// Assemble a report from per-file totals and the cross-file aggregate
    pub fn new(files: &[FileTotals], aggregate: &Aggregate) -> Self {
        let files = files
            .iter()
            .map(|file| FileSummary {
                path: file.path.display().to_string(),
                records: file.totals.records,
                call_edges: file.totals.call_edges,
                totals: file
                    .totals
                    .events
                    .iter()
                    .cloned()
                    .zip(file.totals.totals.iter().copied())
                    .collect(),
            })
            .collect();
        let aggregate = aggregate
            .per_event()
            .map(|(name, event)| {
                (
                    name.to_string(),
                    EventAggregate {
                        total: event.total,
                        files: event.files,
                        average: event.average(),
                    },
                )
            })
            .collect();

        SumReport {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            files,
            aggregate,
        }
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report data to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &SumReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a report from a JSON file
///
/// **Public** - useful for validation, diff, and testing
pub fn read_report(input_path: impl AsRef<Path>) -> Result<SumReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: SumReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: schema {}, {} files",
        report.schema_version,
        report.files.len()
    );

    Ok(report)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{Aggregate, StreamTotals};
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn test_totals() -> FileTotals {
        FileTotals {
            path: PathBuf::from("runs/a/run.istats"),
            totals: StreamTotals {
                events: vec!["Icov".to_string(), "Ir".to_string()],
                totals: vec![3, 120],
                records: 4,
                call_edges: 1,
                source_files: 1,
                functions: 2,
            },
        }
    }

    fn test_report() -> SumReport {
        let files = vec![test_totals()];
        let mut aggregate = Aggregate::new();
        aggregate.add(&files[0].totals);
        SumReport::new(&files, &aggregate)
    }

    #[test]
    fn test_report_assembly() {
        let report = test_report();
        assert_eq!(report.schema_version, REPORT_SCHEMA_VERSION);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].totals["Ir"], 120);
        assert_eq!(report.aggregate["Icov"].total, 3);
        assert_eq!(report.aggregate["Icov"].files, 1);
        assert_eq!(report.aggregate["Icov"].average, 3);
    }

    #[test]
    fn test_write_and_read_report() {
        let report = test_report();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&report, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded.schema_version, report.schema_version);
        assert_eq!(loaded.files.len(), 1);
        assert_eq!(loaded.aggregate["Ir"].total, 120);
    }

    #[test]
    fn test_validate_output_path_empty() {
        let result = validate_output_path(Path::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_output_path(temp_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }
}
