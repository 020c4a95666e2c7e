/// Run report persistence.
///
/// After a successful run a JSON report of every move is written to a hidden
/// file at the root. The report is informational: the sorter never reads it
/// back to alter behavior, and a failure to write it is a warning rather than
/// a run failure. Being hidden, the file is kept out of later scans by the
/// default filters.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the report file, relative to the sorted root.
pub const REPORT_FILE_NAME: &str = ".dirsort_report.json";

/// A single recorded file move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Where the file was discovered (after in-place renaming).
    pub original_path: PathBuf,
    /// Where the move phase put it.
    pub new_path: PathBuf,
    /// The category directory it went to.
    pub category: String,
}

/// Report of one sorting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// RFC 3339 timestamp of when the run happened.
    pub timestamp: String,
    /// The sorted root.
    pub root: PathBuf,
    /// All moves performed, in execution order.
    pub moves: Vec<MoveRecord>,
}

impl RunReport {
    /// Creates an empty report for a root, stamped with the current time.
    pub fn new(root: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            root,
            moves: Vec::new(),
        }
    }

    /// Records one move.
    pub fn record_move(&mut self, original_path: PathBuf, new_path: PathBuf, category: &str) {
        self.moves.push(MoveRecord {
            original_path,
            new_path,
            category: category.to_string(),
        });
    }

    /// Writes the report to `root/.dirsort_report.json`, replacing any report
    /// from a previous run.
    pub fn save(&self, root: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(root.join(REPORT_FILE_NAME), json)
    }

    /// Loads the report left by a previous run, if any.
    pub fn load(root: &Path) -> std::io::Result<Option<Self>> {
        let path = root.join(REPORT_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let report = serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Some(report))
    }
}
