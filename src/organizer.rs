/// Mutation phase of the sorting pipeline.
///
/// This module owns the error taxonomy for the whole run, the creation of the
/// six category directories, the per-file moves into them, and the final
/// removal of directories left empty. Nothing in here is transactional: a
/// failure aborts the remaining stages and leaves the partial state in place.
use std::fs;
use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::scanner::FileEntry;

/// Errors surfaced by a sorting run.
#[derive(Debug)]
pub enum SortError {
    /// The root path does not exist or is not a directory. No mutation has
    /// been performed when this is returned.
    NotADirectory { path: PathBuf },
    /// Failed to read a directory during the discovery walk.
    ScanFailed { path: PathBuf, source: std::io::Error },
    /// Failed to create a category or archive subdirectory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to rename a file in place during normalization.
    RenameFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file into its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// The destination already holds a same-named file or directory. The run
    /// aborts rather than overwrite; nothing is deleted.
    NameCollision { destination: PathBuf },
    /// Failed to remove a directory during pruning.
    PruneFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotADirectory { path } => {
                write!(f, "{} is not a directory", path.display())
            }
            Self::ScanFailed { path, source } => {
                write!(f, "Failed to scan {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::RenameFailed { path, source } => {
                write!(f, "Failed to rename {}: {}", path.display(), source)
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::NameCollision { destination } => {
                write!(
                    f,
                    "Destination {} already exists, refusing to overwrite",
                    destination.display()
                )
            }
            Self::PruneFailed { path, source } => {
                write!(
                    f,
                    "Failed to remove empty directory {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotADirectory { .. } | Self::NameCollision { .. } => None,
            Self::ScanFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::RenameFailed { source, .. }
            | Self::PruneFailed { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;

/// Creates one subdirectory per category directly under `root`, in the fixed
/// category order, and returns their paths keyed by that same order.
///
/// Existing directories are reused; creation failures are surfaced and abort
/// the run. Directories that end up receiving no files are removed again by
/// the pruning stage.
pub fn ensure_category_dirs(root: &Path) -> SortResult<Vec<PathBuf>> {
    let mut dirs = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let dir = root.join(category.dir_name());
        if !dir.exists() {
            fs::create_dir(&dir).map_err(|e| SortError::DirectoryCreationFailed {
                path: dir.clone(),
                source: e,
            })?;
        }
        dirs.push(dir);
    }
    Ok(dirs)
}

/// Moves `entry` into `category_dir`, updating the entry's path to its new
/// location.
///
/// The destination is checked first: a pre-existing file or directory of the
/// same name is a [`SortError::NameCollision`], never an overwrite.
pub fn move_entry(entry: &mut FileEntry, category_dir: &Path) -> SortResult<()> {
    let file_name = entry
        .path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| SortError::FileMoveFailure {
            source: entry.path.clone(),
            destination: category_dir.to_path_buf(),
            source_error: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;

    let destination = category_dir.join(file_name);
    if destination == entry.path {
        // Already in place (rerun on a sorted tree).
        return Ok(());
    }
    if destination.exists() {
        return Err(SortError::NameCollision { destination });
    }

    fs::rename(&entry.path, &destination).map_err(|e| SortError::FileMoveFailure {
        source: entry.path.clone(),
        destination: destination.clone(),
        source_error: e,
    })?;

    entry.path = destination;
    Ok(())
}

/// Removes every directory under `root` left with zero entries, at any depth.
///
/// Post-order: children are pruned before their parent is examined, so a
/// directory containing only empty directories disappears entirely. The root
/// itself is never removed. Returns the number of directories removed.
pub fn prune_empty_dirs(root: &Path) -> SortResult<usize> {
    let mut removed = 0;
    let entries = fs::read_dir(root).map_err(|e| SortError::ScanFailed {
        path: root.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| SortError::ScanFailed {
            path: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            removed += prune_empty_dirs(&path)?;
            if dir_is_empty(&path)? {
                fs::remove_dir(&path).map_err(|e| SortError::PruneFailed {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }
    }
    Ok(removed)
}

fn dir_is_empty(path: &Path) -> SortResult<bool> {
    let mut entries = fs::read_dir(path).map_err(|e| SortError::ScanFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(entries.next().is_none())
}
