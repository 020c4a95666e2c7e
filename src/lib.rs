//! dirsort - sort a directory tree into category folders
//!
//! This library classifies every file under a root directory into one of six
//! fixed categories, normalizes filenames to a safe character set, moves the
//! files into category-named subdirectories, expands archives into dedicated
//! subdirectories, and prunes the directories left empty.

pub mod archive;
pub mod category;
pub mod cli;
pub mod config;
pub mod normalize;
pub mod organizer;
pub mod output;
pub mod report;
pub mod scanner;
pub mod sorter;

pub use category::{Category, ExtensionMapper};
pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use organizer::{SortError, SortResult};
pub use report::RunReport;
pub use scanner::{FileEntry, ScanResult};
pub use sorter::{SortOptions, Summary, organize, organize_with};
