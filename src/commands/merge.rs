//! Merge command implementation.
//!
//! The merge command:
//! 1. Validates the input run directories
//! 2. Compares the instrumented artifacts byte for byte
//! 3. Merges all statistics streams into the output directory
//! 4. Copies the shared artifact next to the merged statistics

use crate::merge::merge_streams;
use crate::parser::StatsReader;
use crate::utils::config::{DEFAULT_ARTIFACT_FILENAME, DEFAULT_STATS_FILENAME};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the merge command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct MergeArgs {
    /// Input run directories, one per run
    pub input_dirs: Vec<PathBuf>,

    /// Output directory for the merged run
    pub output_dir: PathBuf,

    /// Statistics file name inside each run directory
    pub stats_file: String,

    /// Instrumented artifact file name inside each run directory
    pub artifact: String,
}

impl Default for MergeArgs {
    fn default() -> Self {
        Self {
            input_dirs: Vec::new(),
            output_dir: PathBuf::from("merged"),
            stats_file: DEFAULT_STATS_FILENAME.to_string(),
            artifact: DEFAULT_ARTIFACT_FILENAME.to_string(),
        }
    }
}

/// Execute the merge command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Merge command arguments
///
/// # Returns
/// Ok if the merged run directory was written completely
///
/// # Errors
/// * Input validation failures
/// * Artifact mismatches between runs
/// * Any merge failure from the drivers; the partially written output file
///   is not usable in that case
pub fn execute_merge(args: MergeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!(
        "Merging {} runs into: {}",
        args.input_dirs.len(),
        args.output_dir.display()
    );

    // Step 1/4: Validate inputs
    info!("Step 1/4: Validating input directories...");
    validate_args(&args)?;

    // Step 2/4: Runs are only comparable over the same instrumented artifact
    info!("Step 2/4: Comparing instrumented artifacts...");
    check_artifacts(&args)?;

    // Step 3/4: Merge the statistics streams
    info!("Step 3/4: Merging statistics streams...");
    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    let mut readers = open_readers(&args)?;
    let output_stats = args.output_dir.join(&args.stats_file);
    let output_artifact = args.output_dir.join(&args.artifact);

    let file = File::create(&output_stats)
        .with_context(|| format!("Failed to create {}", output_stats.display()))?;
    let mut writer = BufWriter::new(file);
    let summary = merge_streams(
        &mut readers,
        &mut writer,
        &output_artifact.display().to_string(),
    )
    .context("Failed to merge statistics streams")?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", output_stats.display()))?;

    // Step 4/4: Copy the shared artifact
    info!("Step 4/4: Copying instrumented artifact...");
    let artifact_source = args.input_dirs[0].join(&args.artifact);
    fs::copy(&artifact_source, &output_artifact).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            artifact_source.display(),
            output_artifact.display()
        )
    })?;

    info!("✓ Merged statistics written to: {}", output_stats.display());
    info!("✓ Artifact copied to: {}", output_artifact.display());

    let elapsed = start_time.elapsed();
    info!(
        "Merge completed in {:.2}s: {} records, {} call edges, {} events",
        elapsed.as_secs_f64(),
        summary.records,
        summary.call_edges,
        summary.events.len()
    );

    Ok(())
}

/// Validate merge arguments
///
/// **Public** - can be called before execute_merge for early validation
///
/// # Arguments
/// * `args` - Arguments to validate
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &MergeArgs) -> Result<()> {
    if args.input_dirs.len() < 2 {
        anyhow::bail!("At least two input directories are required");
    }
    if args.stats_file.is_empty() {
        anyhow::bail!("Statistics file name cannot be empty");
    }
    if args.artifact.is_empty() {
        anyhow::bail!("Artifact file name cannot be empty");
    }

    for dir in &args.input_dirs {
        if !dir.is_dir() {
            anyhow::bail!("Input directory does not exist: {}", dir.display());
        }
        let stats = dir.join(&args.stats_file);
        if !stats.is_file() {
            anyhow::bail!("Missing statistics file: {}", stats.display());
        }
        if *dir == args.output_dir {
            anyhow::bail!(
                "Output directory must differ from every input directory: {}",
                dir.display()
            );
        }
    }

    Ok(())
}

/// Require all runs' artifacts to be byte-identical
///
/// **Private** - internal helper for execute_merge
fn check_artifacts(args: &MergeArgs) -> Result<()> {
    let reference_path = args.input_dirs[0].join(&args.artifact);
    let reference = fs::read(&reference_path)
        .with_context(|| format!("Failed to read {}", reference_path.display()))?;

    for dir in &args.input_dirs[1..] {
        let path = dir.join(&args.artifact);
        let candidate =
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        if candidate != reference {
            anyhow::bail!(
                "Instrumented artifacts differ: {} vs {}",
                reference_path.display(),
                path.display()
            );
        }
    }

    debug!(
        "All {} artifacts match ({} bytes)",
        args.input_dirs.len(),
        reference.len()
    );
    Ok(())
}

/// Open one statistics reader per input directory
///
/// **Private** - internal helper for execute_merge
fn open_readers(args: &MergeArgs) -> Result<Vec<StatsReader<BufReader<File>>>> {
    let mut readers = Vec::with_capacity(args.input_dirs.len());
    for dir in &args.input_dirs {
        let path = dir.join(&args.stats_file);
        let file =
            File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        readers.push(StatsReader::new(BufReader::new(file)));
    }
    Ok(readers)
}
