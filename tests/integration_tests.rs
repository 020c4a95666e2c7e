/// Integration tests for dirsort
///
/// These tests run the full sorting pipeline against real temporary
/// directory trees.
///
/// Test categories:
/// 1. Basic sorting and pruning
/// 2. Filename normalization
/// 3. Archive expansion
/// 4. Error scenarios and collision policy
/// 5. Idempotence and rerun behavior
/// 6. Filter configuration
/// 7. Command-line interface
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use dirsort::FilterConfig;
use dirsort::cli::{Cli, run_cli};
use dirsort::config::{ExcludeRules, FilterRules};
use dirsort::organizer::SortError;
use dirsort::sorter::{SortOptions, organize, organize_with};

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture over a temporary directory tree.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content at a path relative to the root, creating
    /// parent directories as needed.
    fn create_file(&self, rel_path: &str, content: &[u8]) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    fn create_subdir(&self, rel_path: &str) {
        fs::create_dir_all(self.path().join(rel_path)).expect("Failed to create subdirectory");
    }

    /// Create a real zip archive containing the given (name, content) files.
    fn create_zip(&self, rel_path: &str, files: &[(&str, &str)]) {
        let file = File::create(self.path().join(rel_path)).expect("Failed to create zip");
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in files {
            writer.start_file(*name, options).expect("start_file");
            writer.write_all(content.as_bytes()).expect("write");
        }
        writer.finish().expect("finish");
    }

    /// Create a real tar archive containing the given (name, content) files.
    fn create_tar(&self, rel_path: &str, files: &[(&str, &str)]) {
        let file = File::create(self.path().join(rel_path)).expect("Failed to create tar");
        let mut builder = tar::Builder::new(file);
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .expect("append");
        }
        builder.finish().expect("finish");
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Should not exist: {}", path.display());
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }

    /// List all files in the tree recursively, as paths relative to the root.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(&self.path().to_path_buf(), &mut files);
        let mut relative: Vec<PathBuf> = files
            .iter()
            .map(|p| p.strip_prefix(self.path()).unwrap().to_path_buf())
            .collect();
        relative.sort();
        relative
    }

    fn walk_dir(dir: &PathBuf, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }
}

/// Run the sorter without writing a report file, so assertions about the
/// resulting tree stay simple.
fn sort_quiet(root: &Path) -> Result<dirsort::Summary, SortError> {
    let filters = FilterConfig::default().compile().expect("default filters");
    organize_with(
        root,
        &filters,
        &SortOptions {
            write_report: false,
        },
        None,
    )
}

// ============================================================================
// Test Suite 1: Basic Sorting and Pruning
// ============================================================================

#[test]
fn test_sort_empty_directory() {
    let fixture = TestFixture::new();

    let summary = sort_quiet(fixture.path()).expect("Should succeed on empty directory");

    assert_eq!(summary.total_moved(), 0);
    // All six category directories were created and then pruned again.
    for name in ["image", "video", "audio", "document", "archive", "unknown"] {
        fixture.assert_not_exists(name);
    }
}

#[test]
fn test_sort_one_file_per_category() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.png", b"img");
    fixture.create_file("clip.mov", b"vid");
    fixture.create_file("song.ogg", b"aud");
    fixture.create_file("sheet.xlsx", b"doc");
    fixture.create_file("data.bin", b"???");

    let summary = sort_quiet(fixture.path()).expect("Sort failed");

    assert_eq!(summary.total_moved(), 5);
    fixture.assert_file_exists("image/photo.png");
    fixture.assert_file_exists("video/clip.mov");
    fixture.assert_file_exists("audio/song.ogg");
    fixture.assert_file_exists("document/sheet.xlsx");
    fixture.assert_file_exists("unknown/data.bin");
    fixture.assert_not_exists("archive");
}

#[test]
fn test_sort_nested_tree_and_prune_empty_dirs() {
    let fixture = TestFixture::new();
    fixture.create_file("deep/nested/path/track.mp3", b"aud");
    fixture.create_file("other/report.pdf", b"doc");
    fixture.create_subdir("already/empty");

    let summary = sort_quiet(fixture.path()).expect("Sort failed");

    fixture.assert_file_exists("audio/track.mp3");
    fixture.assert_file_exists("document/report.pdf");
    // Source directories emptied by the moves are gone, and so is the
    // directory that was empty to begin with.
    fixture.assert_not_exists("deep");
    fixture.assert_not_exists("other");
    fixture.assert_not_exists("already");
    assert!(summary.pruned_dirs >= 5);
}

#[test]
fn test_uppercase_extension_classifies_but_is_preserved() {
    let fixture = TestFixture::new();
    fixture.create_file("HOLIDAY.JPG", b"img");

    sort_quiet(fixture.path()).expect("Sort failed");

    fixture.assert_file_exists("image/HOLIDAY.JPG");
}

#[test]
fn test_extensionless_file_goes_to_unknown() {
    let fixture = TestFixture::new();
    fixture.create_file("README", b"text");

    sort_quiet(fixture.path()).expect("Sort failed");

    fixture.assert_file_exists("unknown/README");
}

#[test]
fn test_directory_named_like_category_is_skipped_entirely() {
    let fixture = TestFixture::new();
    fixture.create_file("video/holiday.mp4", b"vid");
    fixture.create_file("nested/audio/song.mp3", b"aud");
    fixture.create_file("loose.mp4", b"vid");

    sort_quiet(fixture.path()).expect("Sort failed");

    // Files inside category-named directories were never discovered.
    fixture.assert_file_exists("video/holiday.mp4");
    fixture.assert_file_exists("nested/audio/song.mp3");
    fixture.assert_file_exists("video/loose.mp4");
}

// ============================================================================
// Test Suite 2: Filename Normalization
// ============================================================================

#[test]
fn test_cyrillic_photo_scenario() {
    let fixture = TestFixture::new();
    fixture.create_file("фото.jpg", b"img");

    let summary = sort_quiet(fixture.path()).expect("Sort failed");

    assert_eq!(summary.renamed, 1);
    fixture.assert_file_exists("image/foto.jpg");
    // Unused category directories were pruned.
    fixture.assert_not_exists("video");
    fixture.assert_not_exists("audio");
    fixture.assert_not_exists("document");
    fixture.assert_not_exists("archive");
    fixture.assert_not_exists("unknown");
}

#[test]
fn test_normalization_handles_spaces_and_punctuation() {
    let fixture = TestFixture::new();
    fixture.create_file("моя пісня (remix).mp3", b"aud");

    sort_quiet(fixture.path()).expect("Sort failed");

    fixture.assert_file_exists("audio/moya_pisnya__remix_.mp3");
}

#[test]
fn test_already_safe_names_are_not_renamed() {
    let fixture = TestFixture::new();
    fixture.create_file("vacation_2024.jpg", b"img");

    let summary = sort_quiet(fixture.path()).expect("Sort failed");

    assert_eq!(summary.renamed, 0);
    fixture.assert_file_exists("image/vacation_2024.jpg");
}

// ============================================================================
// Test Suite 3: Archive Expansion
// ============================================================================

#[test]
fn test_zip_archive_expanded_into_named_subdirectory() {
    let fixture = TestFixture::new();
    fixture.create_zip("archive.zip", &[("one.txt", "1"), ("two.txt", "2")]);

    let summary = sort_quiet(fixture.path()).expect("Sort failed");

    assert_eq!(summary.archives_expanded, 1);
    fixture.assert_file_exists("archive/archive/one.txt");
    fixture.assert_file_exists("archive/archive/two.txt");
    fixture.assert_not_exists("archive/archive.zip");
    fixture.assert_not_exists("archive/archive/archive.zip");
}

#[test]
fn test_tar_archive_expanded() {
    let fixture = TestFixture::new();
    fixture.create_tar("backup.tar", &[("notes.txt", "hello")]);

    let summary = sort_quiet(fixture.path()).expect("Sort failed");

    assert_eq!(summary.archives_expanded, 1);
    fixture.assert_file_exists("archive/backup/notes.txt");
    fixture.assert_not_exists("archive/backup.tar");
}

#[test]
fn test_cyrillic_archive_subdirectory_uses_normalized_stem() {
    let fixture = TestFixture::new();
    fixture.create_zip("архів.zip", &[("a.txt", "a")]);

    sort_quiet(fixture.path()).expect("Sort failed");

    fixture.assert_file_exists("archive/arkhiv/a.txt");
}

#[test]
fn test_corrupt_archive_reported_but_run_succeeds() {
    let fixture = TestFixture::new();
    fixture.create_file("broken.zip", b"definitely not a zip");
    fixture.create_file("fine.txt", b"doc");

    let summary = sort_quiet(fixture.path()).expect("Run should still succeed");

    assert_eq!(summary.archives_expanded, 0);
    assert_eq!(summary.archive_failures.len(), 1);
    // The rest of the run was unaffected, and the archive file survived.
    fixture.assert_file_exists("document/fine.txt");
    fixture.assert_file_exists("archive/broken/broken.zip");
}

#[test]
fn test_extracted_contents_are_not_reclassified() {
    let fixture = TestFixture::new();
    fixture.create_zip("media.zip", &[("inner.jpg", "img"), ("inner.mp3", "aud")]);

    sort_quiet(fixture.path()).expect("Sort failed");

    // Media inside the archive stays where extraction put it.
    fixture.assert_file_exists("archive/media/inner.jpg");
    fixture.assert_file_exists("archive/media/inner.mp3");
    fixture.assert_not_exists("image");
    fixture.assert_not_exists("audio");
}

// ============================================================================
// Test Suite 4: Error Scenarios and Collision Policy
// ============================================================================

#[test]
fn test_non_directory_root_is_a_no_op() {
    let fixture = TestFixture::new();
    fixture.create_file("regular.txt", b"content");
    let file_path = fixture.path().join("regular.txt");

    let result = organize(&file_path);

    assert!(matches!(result, Err(SortError::NotADirectory { .. })));
    // Zero filesystem mutations.
    assert_eq!(fixture.list_files_recursive(), vec![PathBuf::from("regular.txt")]);
}

#[test]
fn test_missing_root_is_a_no_op() {
    let fixture = TestFixture::new();
    let result = organize(&fixture.path().join("does-not-exist"));
    assert!(matches!(result, Err(SortError::NotADirectory { .. })));
}

#[test]
fn test_move_collision_aborts_without_overwriting() {
    // Two same-named documents in different directories collide in
    // document/; the run aborts and neither copy is lost.
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", b"first");
    fixture.create_file("sub/a.txt", b"second");

    let result = sort_quiet(fixture.path());

    assert!(matches!(result, Err(SortError::NameCollision { .. })));
    let moved = fs::read_to_string(fixture.path().join("document/a.txt"))
        .expect("First file should have moved");
    let stranded = fs::read_to_string(fixture.path().join("sub/a.txt"))
        .expect("Second file should be untouched");
    assert_eq!(moved, "first");
    assert_eq!(stranded, "second");
}

// ============================================================================
// Test Suite 5: Idempotence and Rerun Behavior
// ============================================================================

#[test]
fn test_second_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.jpg", b"img");
    fixture.create_file("фільм.mkv", b"vid");
    fixture.create_file("stuff/data.xyz", b"???");

    let first = sort_quiet(fixture.path()).expect("First run failed");
    assert_eq!(first.total_moved(), 3);

    let tree_after_first = fixture.list_files_recursive();
    let second = sort_quiet(fixture.path()).expect("Second run failed");

    assert_eq!(second.total_moved(), 0);
    assert_eq!(second.renamed, 0);
    assert_eq!(second.archives_expanded, 0);
    assert_eq!(fixture.list_files_recursive(), tree_after_first);
}

#[test]
fn test_run_report_written_and_ignored_on_rerun() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.jpg", b"img");

    let filters = FilterConfig::default().compile().expect("filters");
    organize_with(fixture.path(), &filters, &SortOptions::default(), None)
        .expect("First run failed");

    fixture.assert_file_exists(".dirsort_report.json");
    let report = dirsort::RunReport::load(fixture.path())
        .expect("Failed to read report")
        .expect("Report should exist");
    assert_eq!(report.moves.len(), 1);

    // The hidden report file is not classified on a second run.
    let summary = organize_with(fixture.path(), &filters, &SortOptions::default(), None)
        .expect("Second run failed");
    assert_eq!(summary.total_moved(), 0);
    fixture.assert_file_exists(".dirsort_report.json");
}

#[test]
fn test_rerun_after_adding_new_files() {
    let fixture = TestFixture::new();
    fixture.create_file("old.pdf", b"doc");
    sort_quiet(fixture.path()).expect("First run failed");

    fixture.create_file("new.jpg", b"img");
    let summary = sort_quiet(fixture.path()).expect("Second run failed");

    assert_eq!(summary.total_moved(), 1);
    fixture.assert_file_exists("document/old.pdf");
    fixture.assert_file_exists("image/new.jpg");
}

// ============================================================================
// Test Suite 6: Filter Configuration
// ============================================================================

#[test]
fn test_hidden_files_are_left_alone_by_default() {
    let fixture = TestFixture::new();
    fixture.create_file(".secret.txt", b"hidden");
    fixture.create_file("visible.txt", b"doc");

    sort_quiet(fixture.path()).expect("Sort failed");

    fixture.assert_file_exists(".secret.txt");
    fixture.assert_file_exists("document/visible.txt");
}

#[test]
fn test_excluded_extension_is_not_sorted() {
    let fixture = TestFixture::new();
    fixture.create_file("keep-here.tmp", b"scratch");
    fixture.create_file("sort-me.txt", b"doc");

    let filters = FilterConfig {
        filters: FilterRules {
            enable_hidden_files: false,
            exclude: ExcludeRules {
                extensions: vec!["tmp".to_string()],
                ..Default::default()
            },
        },
    }
    .compile()
    .expect("filters");

    organize_with(
        fixture.path(),
        &filters,
        &SortOptions {
            write_report: false,
        },
        None,
    )
    .expect("Sort failed");

    fixture.assert_file_exists("keep-here.tmp");
    fixture.assert_file_exists("document/sort-me.txt");
}

#[test]
fn test_summary_display_is_human_readable() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.jpg", b"img");
    fixture.create_subdir("empty-dir");

    let summary = sort_quiet(fixture.path()).expect("Sort failed");
    let text = summary.to_string();

    assert!(text.starts_with("Sorted successfully"));
    assert!(text.contains("1 files moved"));
    fixture.assert_dir_exists("image");
}

// ============================================================================
// Test Suite 7: Command-Line Interface
// ============================================================================

/// Snapshot of a fixture tree: every file's relative path and contents.
fn snapshot_tree(fixture: &TestFixture) -> Vec<(PathBuf, Vec<u8>)> {
    fixture
        .list_files_recursive()
        .into_iter()
        .map(|rel| {
            let bytes = fs::read(fixture.path().join(&rel)).expect("Failed to read file");
            (rel, bytes)
        })
        .collect()
}

#[test]
fn test_cli_dry_run_leaves_tree_untouched() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.jpg", b"img bytes");
    fixture.create_file("фото.png", b"cyrillic img");
    fixture.create_file("docs/report.pdf", b"pdf bytes");
    fixture.create_subdir("empty-dir");

    let config_fixture = TestFixture::new();
    config_fixture.create_file(
        "rules.toml",
        b"[filters]\n[filters.exclude]\nextensions = []\n",
    );

    let before = snapshot_tree(&fixture);

    let cli = Cli {
        path: fixture.path().to_path_buf(),
        dry_run: true,
        config: Some(config_fixture.path().join("rules.toml")),
        no_report: false,
    };
    run_cli(&cli).expect("Dry run failed");

    assert_eq!(snapshot_tree(&fixture), before);
    fixture.assert_dir_exists("empty-dir");
    fixture.assert_not_exists("image");
    fixture.assert_not_exists(".dirsort_report.json");
}

#[test]
fn test_cli_reports_non_directory_root() {
    let fixture = TestFixture::new();
    fixture.create_file("plain.txt", b"not a directory");

    let config_fixture = TestFixture::new();
    config_fixture.create_file("rules.toml", b"[filters]\n");

    let cli = Cli {
        path: fixture.path().join("plain.txt"),
        dry_run: false,
        config: Some(config_fixture.path().join("rules.toml")),
        no_report: true,
    };
    let message = run_cli(&cli).expect_err("Expected a failure message");

    assert!(message.contains("is not a directory"));
    fixture.assert_file_exists("plain.txt");
}

#[test]
fn test_cli_surfaces_missing_config_file() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.jpg", b"img");

    let cli = Cli {
        path: fixture.path().to_path_buf(),
        dry_run: true,
        config: Some(fixture.path().join("no-such-config.toml")),
        no_report: true,
    };
    let message = run_cli(&cli).expect_err("Expected a configuration error");

    assert!(message.contains("Error loading configuration"));
    assert!(message.contains("Configuration file not found"));
    fixture.assert_file_exists("photo.jpg");
}
