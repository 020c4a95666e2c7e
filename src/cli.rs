//! Command-line interface.
//!
//! Thin layer over the sorting pipeline: argument parsing, filter
//! configuration loading, dry-run preview, and mapping of run results to
//! user-facing output.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::category::{Category, ExtensionMapper};
use crate::config::FilterConfig;
use crate::normalize;
use crate::organizer::SortError;
use crate::output::OutputFormatter;
use crate::scanner;
use crate::sorter::{self, SortOptions};

/// Sort a directory tree into category folders.
#[derive(Debug, Parser)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Directory to sort.
    pub path: PathBuf,

    /// Show what would be done without touching any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a filter configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip writing the run report file.
    #[arg(long)]
    pub no_report: bool,
}

/// Runs the CLI. Returns the message to present on failure.
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let config = FilterConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let filters = config
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    if cli.dry_run {
        return dry_run(&cli.path, &filters);
    }

    OutputFormatter::info(&format!("Sorting contents of: {}", cli.path.display()));

    let options = SortOptions {
        write_report: !cli.no_report,
    };
    let progress = OutputFormatter::create_progress_bar(0);
    let mut on_moved = |done: usize, total: usize| {
        if progress.length() == Some(0) {
            progress.set_length(total as u64);
        }
        progress.set_position(done as u64);
    };

    let result = sorter::organize_with(&cli.path, &filters, &options, Some(&mut on_moved));
    progress.finish_and_clear();

    match result {
        Ok(summary) => {
            for (path, reason) in &summary.archive_failures {
                OutputFormatter::warning(&format!(
                    "Could not expand {}: {}",
                    path.display(),
                    reason
                ));
            }
            if let Some(reason) = &summary.report_error {
                OutputFormatter::warning(&format!("Could not save run report: {}", reason));
            }
            OutputFormatter::summary_table(&summary.moved);
            OutputFormatter::success(&summary.to_string());
            Ok(())
        }
        Err(SortError::NotADirectory { path }) => Err(format!(
            "{} is not a directory, nothing was sorted",
            path.display()
        )),
        Err(e) => Err(format!("Sorting aborted: {}", e)),
    }
}

/// Scans and classifies without mutating anything, printing the would-be
/// destinations.
fn dry_run(root: &Path, filters: &crate::config::CompiledFilters) -> Result<(), String> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", root.display()));

    let mapper = ExtensionMapper::default();
    let scan_result = match scanner::scan(root, &mapper, filters) {
        Ok(result) => result,
        Err(SortError::NotADirectory { path }) => {
            return Err(format!(
                "{} is not a directory, nothing was sorted",
                path.display()
            ));
        }
        Err(e) => return Err(format!("Scan failed: {}", e)),
    };

    if scan_result.total_files() == 0 {
        OutputFormatter::info("No files found to sort.");
        return Ok(());
    }

    let mut moved = std::collections::BTreeMap::new();
    for category in Category::ALL {
        for entry in scan_result.entries(category) {
            let safe_stem = normalize::normalize_stem(&entry.stem);
            let new_name = if entry.extension.is_empty() {
                safe_stem
            } else {
                format!("{}.{}", safe_stem, entry.extension)
            };
            println!(
                " - {} → {}/{}",
                entry.path.display(),
                category.dir_name(),
                new_name
            );
            *moved.entry(category).or_insert(0) += 1;
        }
    }

    OutputFormatter::summary_table(&moved);
    OutputFormatter::success("Dry run complete. No files were modified.");
    Ok(())
}
