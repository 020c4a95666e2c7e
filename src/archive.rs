//! Archive expansion.
//!
//! Runs after the move phase, on entries already sitting inside the archive
//! category directory. Each archive gets a subdirectory named after its stem,
//! is moved into it, extracted there, and deleted once extraction succeeds.
//! Extraction problems are reported per archive and never abort the rest of
//! the run; extracted contents are not re-scanned.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::organizer::{SortError, SortResult};
use crate::scanner::FileEntry;

/// Supported archive container formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    /// Gzip-compressed tar; a bare `.gz` is assumed to wrap a tar stream.
    TarGz,
}

/// Detects the archive format from an extension (without leading dot).
pub fn detect_format(extension: &str) -> Option<ArchiveFormat> {
    match extension.to_lowercase().as_str() {
        "zip" => Some(ArchiveFormat::Zip),
        "tar" => Some(ArchiveFormat::Tar),
        "gz" => Some(ArchiveFormat::TarGz),
        _ => None,
    }
}

/// Outcome of the expansion stage.
#[derive(Debug, Default)]
pub struct ExpansionReport {
    /// Archives successfully extracted and deleted.
    pub expanded: usize,
    /// Archives left unexpanded, with the reason. These do not fail the run.
    pub failures: Vec<(PathBuf, String)>,
}

/// Expands every archive entry in place.
///
/// Per archive: an unsupported format or an already-existing subdirectory is
/// recorded as a failure and that archive is skipped (the file stays where
/// the move phase put it, so no data is lost). Directory creation and
/// file-move refusals from the OS are fatal, matching the move phase.
pub fn expand_archives(entries: &mut [FileEntry]) -> SortResult<ExpansionReport> {
    let mut report = ExpansionReport::default();

    for entry in entries.iter_mut() {
        let format = match detect_format(&entry.extension) {
            Some(format) => format,
            None => {
                report.failures.push((
                    entry.path.clone(),
                    format!("unsupported archive format .{}", entry.extension),
                ));
                continue;
            }
        };

        let parent = entry
            .path
            .parent()
            .ok_or_else(|| SortError::FileMoveFailure {
                source: entry.path.clone(),
                destination: PathBuf::new(),
                source_error: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "archive has no parent directory",
                ),
            })?;
        let subdir = parent.join(&entry.stem);

        // An identically named subdirectory is never silently merged into.
        if subdir.exists() {
            report.failures.push((
                entry.path.clone(),
                format!("destination {} already exists", subdir.display()),
            ));
            continue;
        }
        fs::create_dir(&subdir).map_err(|e| SortError::DirectoryCreationFailed {
            path: subdir.clone(),
            source: e,
        })?;

        let file_name = entry.path.file_name().map(|n| n.to_os_string());
        let archive_path = match file_name {
            Some(name) => subdir.join(name),
            None => continue,
        };
        fs::rename(&entry.path, &archive_path).map_err(|e| SortError::FileMoveFailure {
            source: entry.path.clone(),
            destination: archive_path.clone(),
            source_error: e,
        })?;
        entry.path = archive_path.clone();

        match extract(&archive_path, format, &subdir) {
            Ok(()) => {
                // The archive is deleted only after a successful extraction.
                fs::remove_file(&archive_path).map_err(|e| SortError::FileMoveFailure {
                    source: archive_path.clone(),
                    destination: subdir.clone(),
                    source_error: e,
                })?;
                report.expanded += 1;
            }
            Err(reason) => {
                // Leave the archive file inside its subdirectory untouched.
                report.failures.push((archive_path, reason));
            }
        }
    }

    Ok(report)
}

/// Extracts `archive` into `dest` using its native format. Errors are
/// stringified since they feed the per-archive failure list, not the run
/// error.
fn extract(archive: &Path, format: ArchiveFormat, dest: &Path) -> Result<(), String> {
    match format {
        ArchiveFormat::Zip => {
            let file = File::open(archive).map_err(|e| e.to_string())?;
            let mut zip = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;
            zip.extract(dest).map_err(|e| e.to_string())
        }
        ArchiveFormat::Tar => {
            let file = File::open(archive).map_err(|e| e.to_string())?;
            tar::Archive::new(file)
                .unpack(dest)
                .map_err(|e| e.to_string())
        }
        ArchiveFormat::TarGz => {
            let file = File::open(archive).map_err(|e| e.to_string())?;
            tar::Archive::new(GzDecoder::new(file))
                .unpack(dest)
                .map_err(|e| e.to_string())
        }
    }
}
