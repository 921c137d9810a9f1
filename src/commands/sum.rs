//! Sum command implementation.
//!
//! The sum command:
//! 1. Sums each input file's statistics per event
//! 2. Prints a per-file totals table
//! 3. Prints the cross-file aggregate with per-file averages
//! 4. Optionally writes a JSON report

use crate::output::{write_report, SumReport};
use crate::summary::{sum_file, Aggregate, FileTotals};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the sum command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct SumArgs {
    /// Statistics files to sum
    pub files: Vec<PathBuf>,

    /// Optional JSON report destination
    pub json: Option<PathBuf>,
}

/// Execute the sum command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Sum command arguments
///
/// # Returns
/// Ok if every input file was summed
///
/// # Errors
/// * A missing or malformed input file
/// * JSON report write failures
pub fn execute_sum(args: SumArgs) -> Result<()> {
    validate_args(&args)?;

    let mut aggregate = Aggregate::new();
    let mut summed = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let file = sum_file(path).with_context(|| format!("Failed to sum {}", path.display()))?;
        print_file_table(&file);
        aggregate.add(&file.totals);
        summed.push(file);
    }

    if summed.len() > 1 {
        print_aggregate_table(&aggregate);
    }

    if let Some(json_path) = &args.json {
        let report = SumReport::new(&summed, &aggregate);
        write_report(&report, json_path)
            .with_context(|| format!("Failed to write report to {}", json_path.display()))?;
        info!("✓ Report written to: {}", json_path.display());
    }

    Ok(())
}

/// Validate sum arguments
///
/// **Public** - can be called before execute_sum for early validation
pub fn validate_args(args: &SumArgs) -> Result<()> {
    if args.files.is_empty() {
        anyhow::bail!("At least one statistics file is required");
    }
    for path in &args.files {
        if !path.is_file() {
            anyhow::bail!("Input file does not exist: {}", path.display());
        }
    }
    Ok(())
}

/// Print one file's per-event totals
///
/// **Private** - stdout table rendering
fn print_file_table(file: &FileTotals) {
    println!("{}", file.path.display());
    println!("  {:<24} {:>16}", "Event", "Total");
    for (name, total) in file.totals.events.iter().zip(&file.totals.totals) {
        println!("  {:<24} {:>16}", name, total);
    }
    println!(
        "  ({} records, {} call edges)",
        file.totals.records, file.totals.call_edges
    );
    println!();
}

/// Print the cross-file aggregate
///
/// **Private** - stdout table rendering
fn print_aggregate_table(aggregate: &Aggregate) {
    println!("Aggregate over {} files", aggregate.file_count());
    println!(
        "  {:<24} {:>16} {:>8} {:>16}",
        "Event", "Total", "Files", "Average"
    );
    for (name, event) in aggregate.per_event() {
        println!(
            "  {:<24} {:>16} {:>8} {:>16}",
            name,
            event.total,
            event.files,
            event.average()
        );
    }
    println!();
}
