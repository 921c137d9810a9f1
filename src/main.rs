//! Istats Tools CLI
//!
//! Merges statistics files from independent runs of the same instrumented
//! program, and sums per-event totals across files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use istats_tools::commands::{execute_merge, execute_sum, MergeArgs, SumArgs};
use istats_tools::summary::sum_file;
use istats_tools::utils::config::{
    DEFAULT_ARTIFACT_FILENAME, DEFAULT_STATS_FILENAME, REPORT_SCHEMA_VERSION,
};

/// Istats Tools - merge and sum instrumented-run statistics
#[derive(Parser, Debug)]
#[command(name = "istats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge run directories into one combined run
    Merge {
        /// Input run directories followed by the output directory
        #[arg(num_args = 3.., value_name = "DIR")]
        dirs: Vec<PathBuf>,

        /// Statistics file name inside each run directory
        #[arg(long, default_value = DEFAULT_STATS_FILENAME)]
        stats_file: String,

        /// Instrumented artifact file name inside each run directory
        #[arg(long, default_value = DEFAULT_ARTIFACT_FILENAME)]
        artifact: String,
    },

    /// Sum per-event totals of statistics files
    Sum {
        /// Statistics files to sum
        #[arg(num_args = 1.., value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Validate a statistics file and print its structure
    Validate {
        /// Path to statistics file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Merge {
            dirs,
            stats_file,
            artifact,
        } => {
            // The last directory is the destination, everything before it
            // is an input run.
            let (output_dir, input_dirs) = match dirs.split_last() {
                Some((output, inputs)) if !inputs.is_empty() => (output.clone(), inputs.to_vec()),
                _ => anyhow::bail!("usage: istats merge <DIR> <DIR>... <OUTPUT_DIR>"),
            };

            let args = MergeArgs {
                input_dirs,
                output_dir,
                stats_file,
                artifact,
            };
            execute_merge(args)?;
        }

        Commands::Sum { files, json } => {
            execute_sum(SumArgs { files, json })?;
        }

        Commands::Validate { file } => {
            validate_stats_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a statistics file
///
/// **Private** - internal command implementation
fn validate_stats_file(file_path: PathBuf) -> Result<()> {
    println!("Validating statistics file: {}", file_path.display());

    let file = sum_file(&file_path)?;

    println!("✓ Valid statistics file");
    println!("  Events: {}", file.totals.events.join(" "));
    println!("  Records: {}", file.totals.records);
    println!("  Call edges: {}", file.totals.call_edges);
    println!("  Source files: {}", file.totals.source_files);
    println!("  Functions: {}", file.totals.functions);

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Istats Tools v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("Merging and summation of per-instruction run statistics.");
}
