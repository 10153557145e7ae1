//! Zip archiving of a whole directory tree.
//!
//! The archiver walks every file under a root in deterministic name order,
//! writes a DEFLATE-compressed zip next to the root (`<root>.zip`), and
//! invokes a progress callback after each entry. Entry names are POSIX-style
//! paths relative to the root, so the archive is a faithful relative-path
//! snapshot of the tree regardless of platform.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors that can occur while writing an archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// The directory to archive does not exist.
    DirectoryNotFound { path: PathBuf },
    /// The archive file itself could not be created.
    CreateFailed { path: PathBuf, source: io::Error },
    /// A file could not be read into the archive.
    EntryRead { path: PathBuf, source: io::Error },
    /// The zip writer rejected an operation.
    Zip(zip::result::ZipError),
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryNotFound { path } => {
                write!(f, "Directory not found: {}", path.display())
            }
            Self::CreateFailed { path, source } => {
                write!(f, "Failed to create archive {}: {}", path.display(), source)
            }
            Self::EntryRead { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            Self::Zip(e) => write!(f, "Archive write failed: {}", e),
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Zip(e)
    }
}

/// Bundles a directory tree into a single compressed archive.
pub struct Archiver;

impl Archiver {
    /// Archives every file under `root` into `<root>.zip` and returns the
    /// archive path.
    ///
    /// `on_progress(completed, total)` is called once after each written
    /// entry, with `completed` counting up to `total`. The callback is
    /// advisory: it runs on the caller's thread and a no-op closure is
    /// perfectly valid. On failure whatever was written so far is left in
    /// place; there is no partial-archive cleanup.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirshelf::archive::Archiver;
    /// use std::path::Path;
    ///
    /// let zip_path = Archiver::archive(Path::new("/tmp/photos"), |done, total| {
    ///     eprintln!("{done}/{total}");
    /// })?;
    /// # Ok::<(), dirshelf::archive::ArchiveError>(())
    /// ```
    pub fn archive<F>(root: &Path, mut on_progress: F) -> Result<PathBuf, ArchiveError>
    where
        F: FnMut(usize, usize),
    {
        if !root.is_dir() {
            return Err(ArchiveError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let files: Vec<PathBuf> = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();

        // Sibling of the root, so the archive never contains itself.
        let zip_path = root.with_extension("zip");
        let archive_file = File::create(&zip_path).map_err(|e| ArchiveError::CreateFailed {
            path: zip_path.clone(),
            source: e,
        })?;

        let mut writer = ZipWriter::new(archive_file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let total = files.len();

        for (index, path) in files.iter().enumerate() {
            writer.start_file(Self::entry_name(root, path), options)?;
            let mut input = File::open(path).map_err(|e| ArchiveError::EntryRead {
                path: path.clone(),
                source: e,
            })?;
            io::copy(&mut input, &mut writer).map_err(|e| ArchiveError::EntryRead {
                path: path.clone(),
                source: e,
            })?;
            on_progress(index + 1, total);
        }

        writer.finish()?;
        Ok(zip_path)
    }

    /// POSIX-style path of `path` relative to `root`, used as the entry name.
    fn entry_name(root: &Path, path: &Path) -> String {
        let relative = path.strip_prefix(root).unwrap_or(path);
        relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
