//! Read-only discovery pass over the directory tree.
//!
//! The scanner walks the whole tree before any mutation happens, producing a
//! per-category snapshot of every file to sort. Mutating stages then work off
//! that snapshot, so the walk never races its own moves.
//!
//! Directories whose *name* equals one of the six category names are never
//! entered, at any depth. This keeps reruns from reprocessing the category
//! directories a previous run created; a user directory that happens to share
//! a category name is skipped too.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::category::{Category, ExtensionMapper};
use crate::config::CompiledFilters;
use crate::organizer::{SortError, SortResult};

/// A discovered file and its resolved category.
///
/// The `path` field tracks the current known location of the file: it starts
/// at the discovery-time path and is updated by the normalizer and organizer
/// as the file is renamed and moved.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Current location of the file.
    pub path: PathBuf,
    /// Filename without extension, as discovered.
    pub stem: String,
    /// Extension without the leading dot; empty if the file has none.
    pub extension: String,
    /// Resolved category.
    pub category: Category,
}

/// Snapshot produced by a scan: ordered file entries per category.
#[derive(Debug, Default)]
pub struct ScanResult {
    by_category: BTreeMap<Category, Vec<FileEntry>>,
}

impl ScanResult {
    /// Entries for one category, in discovery order.
    pub fn entries(&self, category: Category) -> &[FileEntry] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable entries for one category.
    pub fn entries_mut(&mut self, category: Category) -> &mut Vec<FileEntry> {
        self.by_category.entry(category).or_default()
    }

    /// Total number of discovered files.
    pub fn total_files(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    fn push(&mut self, entry: FileEntry) {
        self.entries_mut(entry.category).push(entry);
    }
}

/// Recursively discovers every file under `root`, grouped by category.
///
/// Fails with [`SortError::NotADirectory`] if `root` does not exist or is not
/// a directory; no partial work is performed. Per-directory entries are
/// visited in file-name order so that two scans of an unmodified tree
/// enumerate the same files in the same order. Files rejected by `filters`
/// (hidden files by default, plus any configured exclusions) are not
/// discovered at all.
pub fn scan(
    root: &Path,
    mapper: &ExtensionMapper,
    filters: &CompiledFilters,
) -> SortResult<ScanResult> {
    if !root.is_dir() {
        return Err(SortError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut result = ScanResult::default();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // Never descend into a directory named after a category. The root
            // itself (depth 0) is always entered.
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .map(|name| !Category::is_category_dir_name(name))
                .unwrap_or(true)
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            SortError::ScanFailed {
                path,
                source: e.into(),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if !filters.should_include(&path) {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let category = mapper.classify(&extension);

        result.push(FileEntry {
            path,
            stem,
            extension,
            category,
        });
    }

    Ok(result)
}
