/// File categorization for directory sorting.
///
/// Maps file extensions to one of six fixed categories. The category set and
/// the extension table are the persisted contract with the filesystem: the
/// sorter creates one directory per category directly under the root, named
/// after the category.
///
/// # Examples
///
/// ```
/// use dirsort::category::{Category, ExtensionMapper};
///
/// let mapper = ExtensionMapper::default();
/// assert_eq!(mapper.classify("jpg"), Category::Image);
/// assert_eq!(mapper.classify("PDF"), Category::Document);
/// assert_eq!(mapper.classify("xyz"), Category::Unknown);
/// ```
use std::collections::HashMap;

/// The six fixed file-type buckets, in directory-creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Image files (JPEG, PNG, SVG).
    Image,
    /// Video files (AVI, MP4, MOV, MKV).
    Video,
    /// Audio files (MP3, OGG, WAV, AMR).
    Audio,
    /// Document files (DOC, TXT, PDF, XLSX, PPTX).
    Document,
    /// Archive files (ZIP, GZ, TAR).
    Archive,
    /// Everything else.
    Unknown,
}

impl Category {
    /// All categories in their fixed order.
    pub const ALL: [Category; 6] = [
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Document,
        Category::Archive,
        Category::Unknown,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "image");
    /// assert_eq!(Category::Unknown.dir_name(), "unknown");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Document => "document",
            Category::Archive => "archive",
            Category::Unknown => "unknown",
        }
    }

    /// Returns true if `name` equals one of the six category directory names.
    ///
    /// The scanner never descends into such directories, at any depth.
    pub fn is_category_dir_name(name: &str) -> bool {
        Category::ALL.iter().any(|c| c.dir_name() == name)
    }
}

/// Maps file extensions to categories.
///
/// The table is immutable after construction; lookups lowercase the extension
/// so that `JPG` and `jpg` classify identically.
#[derive(Debug, Clone)]
pub struct ExtensionMapper {
    extension_map: HashMap<String, Category>,
}

/// Extension table, without the leading dot. Extensions absent from this
/// table classify as `Unknown`.
const EXTENSION_TABLE: &[(&str, Category)] = &[
    ("jpeg", Category::Image),
    ("jpg", Category::Image),
    ("png", Category::Image),
    ("svg", Category::Image),
    ("avi", Category::Video),
    ("mp4", Category::Video),
    ("mov", Category::Video),
    ("mkv", Category::Video),
    ("mp3", Category::Audio),
    ("ogg", Category::Audio),
    ("wav", Category::Audio),
    ("amr", Category::Audio),
    ("doc", Category::Document),
    ("docx", Category::Document),
    ("txt", Category::Document),
    ("pdf", Category::Document),
    ("xlsx", Category::Document),
    ("pptx", Category::Document),
    ("zip", Category::Archive),
    ("gz", Category::Archive),
    ("tar", Category::Archive),
];

impl ExtensionMapper {
    /// Creates a mapper with the standard extension table.
    pub fn new() -> Self {
        let extension_map = EXTENSION_TABLE
            .iter()
            .map(|(ext, category)| (ext.to_string(), *category))
            .collect();
        Self { extension_map }
    }

    /// Maps a file extension (without leading dot) to its category.
    ///
    /// Total and deterministic: unmatched extensions yield `Category::Unknown`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::category::{Category, ExtensionMapper};
    ///
    /// let mapper = ExtensionMapper::default();
    /// assert_eq!(mapper.classify("tar"), Category::Archive);
    /// assert_eq!(mapper.classify(""), Category::Unknown);
    /// ```
    pub fn classify(&self, ext: &str) -> Category {
        self.extension_map
            .get(&ext.to_lowercase())
            .copied()
            .unwrap_or(Category::Unknown)
    }
}

impl Default for ExtensionMapper {
    fn default() -> Self {
        Self::new()
    }
}
