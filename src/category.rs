//! Extension-based file categorization.
//!
//! Maps a file's extension to one of the fixed categories used for
//! directory-based organization. Matching is case-insensitive and walks the
//! rule table in declaration order, so the first category owning an
//! extension wins. Files with no matching rule fall into the catch-all
//! category.
//!
//! # Examples
//!
//! ```
//! use dirshelf::category::{Category, CategoryRules};
//!
//! let rules = CategoryRules::default();
//! assert_eq!(rules.classify("holiday.JPG"), Category::Images);
//! assert_eq!(rules.classify("notes.txt"), Category::Documents);
//! assert_eq!(rules.classify("unknown.xyz"), Category::Other);
//! ```

use std::path::Path;

/// A named bucket that owns one extension set and one destination subfolder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Image files (JPG, PNG, GIF, etc.)
    Images,
    /// Document files (PDF, DOCX, TXT, etc.)
    Documents,
    /// Video files (MP4, MKV, AVI, etc.)
    Videos,
    /// Music files (MP3, WAV, FLAC, etc.)
    Music,
    /// Compressed archive files (ZIP, RAR, 7Z, etc.)
    Archives,
    /// Catch-all for everything without a matching rule.
    Other,
}

impl Category {
    /// Returns the subfolder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirshelf::category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Videos => "Videos",
            Category::Music => "Music",
            Category::Archives => "Archives",
            Category::Other => "Other",
        }
    }
}

/// The fixed rule table: one entry per category, in match priority order.
/// Extensions are lowercase and carry the leading dot. The catch-all owns
/// no extensions and must stay last.
const RULE_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff"],
    ),
    (
        Category::Documents,
        &[".pdf", ".doc", ".docx", ".txt", ".xls", ".xlsx", ".ppt", ".pptx"],
    ),
    (Category::Videos, &[".mp4", ".avi", ".mkv", ".mov", ".wmv"]),
    (Category::Music, &[".mp3", ".wav", ".flac", ".aac"]),
    (Category::Archives, &[".zip", ".rar", ".7z", ".tar", ".gz"]),
    (Category::Other, &[]),
];

/// Ordered mapping from file extension to category.
///
/// The declaration order of the rules is significant: `classify` returns the
/// first matching category, so an extension accidentally listed twice would
/// always resolve to the earlier rule.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<(Category, Vec<String>)>,
}

impl CategoryRules {
    /// Creates the standard rule set.
    pub fn new() -> Self {
        Self {
            rules: RULE_TABLE
                .iter()
                .map(|(category, extensions)| {
                    (
                        *category,
                        extensions.iter().map(|ext| ext.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Returns every declared category in declaration order, the catch-all
    /// included. Organize creates one subfolder per entry of this list.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.rules.iter().map(|(category, _)| *category)
    }

    /// Classifies a file name into a category by its extension.
    ///
    /// The extension is lowercased before lookup; files without an extension
    /// or with an unmapped one land in [`Category::Other`]. This never
    /// fails: every file name has a category.
    pub fn classify(&self, file_name: &str) -> Category {
        let extension = match Path::new(file_name).extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
            None => return Category::Other,
        };

        for (category, extensions) in &self.rules {
            if extensions.iter().any(|known| known == &extension) {
                return *category;
            }
        }

        Category::Other
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a file is skipped by organize: hidden files (leading dot) and the
/// Windows folder-metadata file `desktop.ini`, matched case-insensitively.
/// These are never moved and never recorded in a ledger.
///
/// # Examples
///
/// ```
/// use dirshelf::category::is_organize_excluded;
///
/// assert!(is_organize_excluded(".env"));
/// assert!(is_organize_excluded("Desktop.INI"));
/// assert!(!is_organize_excluded("report.pdf"));
/// ```
pub fn is_organize_excluded(file_name: &str) -> bool {
    file_name.starts_with('.') || file_name.eq_ignore_ascii_case("desktop.ini")
}

/// Whether a file is hidden from the displayed file count: `desktop.ini` and
/// anything with a `.ini` extension. This is a presentational filter for
/// statistics only and is intentionally different from
/// [`is_organize_excluded`]; unifying the two would change displayed counts.
pub fn is_stats_excluded(file_name: &str) -> bool {
    file_name.eq_ignore_ascii_case("desktop.ini")
        || Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ini"))
}
