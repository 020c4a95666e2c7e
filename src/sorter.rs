//! The sorting pipeline.
//!
//! This is the single entry point consumed by callers: discover everything
//! first, then mutate. Stages run strictly in order (scan, normalize
//! filenames, ensure category directories, move, expand archives, prune) and
//! the first stage error aborts the rest. There is no rollback: whatever
//! partial state exists at the point of failure is left as-is.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::archive;
use crate::category::{Category, ExtensionMapper};
use crate::config::{CompiledFilters, FilterConfig};
use crate::normalize;
use crate::organizer::{self, SortResult};
use crate::report::RunReport;
use crate::scanner;

/// Options for a sorting run.
#[derive(Debug, Clone)]
pub struct SortOptions {
    /// Write a `.dirsort_report.json` at the root after the run.
    pub write_report: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self { write_report: true }
    }
}

/// What a completed run did.
#[derive(Debug, Default)]
pub struct Summary {
    /// Files moved into each category directory.
    pub moved: BTreeMap<Category, usize>,
    /// Files renamed during normalization.
    pub renamed: usize,
    /// Archives extracted and deleted.
    pub archives_expanded: usize,
    /// Archives that could not be expanded, with reasons. Non-fatal.
    pub archive_failures: Vec<(PathBuf, String)>,
    /// Empty directories removed by the pruning stage.
    pub pruned_dirs: usize,
    /// Set when the run report could not be written (the run itself still
    /// succeeded).
    pub report_error: Option<String>,
}

impl Summary {
    /// Total number of files moved.
    pub fn total_moved(&self) -> usize {
        self.moved.values().sum()
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sorted successfully: {} files moved ({} renamed, {} archives expanded, {} empty directories removed)",
            self.total_moved(),
            self.renamed,
            self.archives_expanded,
            self.pruned_dirs
        )?;
        if !self.archive_failures.is_empty() {
            write!(
                f,
                "; {} archives left unexpanded",
                self.archive_failures.len()
            )?;
        }
        Ok(())
    }
}

/// Sorts `root` with default filters and options.
///
/// This is the boundary call: on success the returned [`Summary`] renders the
/// user-facing confirmation; an invalid root produces
/// [`SortError::NotADirectory`](crate::organizer::SortError::NotADirectory)
/// with zero filesystem mutations performed.
pub fn organize(root: &Path) -> SortResult<Summary> {
    let filters = FilterConfig::default()
        .compile()
        .expect("Default filter config is valid");
    organize_with(root, &filters, &SortOptions::default(), None)
}

/// Sorts `root` with explicit filters and options.
///
/// `progress`, when provided, is called after each file move with
/// `(moved_so_far, total_to_move)`.
pub fn organize_with(
    root: &Path,
    filters: &CompiledFilters,
    options: &SortOptions,
    mut progress: Option<&mut dyn FnMut(usize, usize)>,
) -> SortResult<Summary> {
    let mapper = ExtensionMapper::default();
    let mut summary = Summary::default();

    // Discovery: complete, read-only snapshot before any mutation.
    let mut scan_result = scanner::scan(root, &mapper, filters)?;

    // Normalization: rename in place, in each file's original directory.
    for category in Category::ALL {
        for entry in scan_result.entries_mut(category).iter_mut() {
            if normalize::rename_entry(entry)? {
                summary.renamed += 1;
            }
        }
    }

    let category_dirs = organizer::ensure_category_dirs(root)?;

    // Moves, in category order then scan order within each category.
    let total = scan_result.total_files();
    let mut moved = 0;
    let mut report = RunReport::new(root.to_path_buf());
    for (category, category_dir) in Category::ALL.into_iter().zip(&category_dirs) {
        for entry in scan_result.entries_mut(category).iter_mut() {
            let original = entry.path.clone();
            organizer::move_entry(entry, category_dir)?;
            if entry.path != original {
                report.record_move(original, entry.path.clone(), category.dir_name());
                *summary.moved.entry(category).or_insert(0) += 1;
            }
            moved += 1;
            if let Some(cb) = progress.as_mut() {
                cb(moved, total);
            }
        }
    }

    // Archive expansion, only on entries now inside the archive directory.
    let expansion = archive::expand_archives(scan_result.entries_mut(Category::Archive))?;
    summary.archives_expanded = expansion.expanded;
    summary.archive_failures = expansion.failures;

    summary.pruned_dirs = organizer::prune_empty_dirs(root)?;

    if options.write_report {
        if let Err(e) = report.save(root) {
            summary.report_error = Some(e.to_string());
        }
    }

    Ok(summary)
}
