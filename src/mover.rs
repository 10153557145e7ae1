//! Single tracked file moves with collision-safe destination naming.
//!
//! The mover guarantees that no move ever overwrites existing content: when
//! the desired destination is taken, the file is renamed to `stem_copyN.ext`
//! for the first free N, inside the same directory as the desired
//! destination. The move itself tries a rename first and falls back to
//! copy-plus-delete, which covers moves across filesystem boundaries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A filesystem move that could not be completed.
///
/// Carries both endpoints so callers can report exactly which transfer
/// failed. The organizer wraps this into its own error type; it is never
/// swallowed.
#[derive(Debug)]
pub struct MoveError {
    /// The file that was being moved.
    pub source: PathBuf,
    /// The collision-resolved destination the move was targeting.
    pub destination: PathBuf,
    /// The underlying filesystem error.
    pub error: io::Error,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to move {} to {}: {}",
            self.source.display(),
            self.destination.display(),
            self.error
        )
    }
}

impl std::error::Error for MoveError {}

/// Resolves a desired destination path to one that does not exist yet.
///
/// If `desired` is free it is returned unchanged. Otherwise candidates
/// `stem_copy1.ext`, `stem_copy2.ext`, ... are tried in the same parent
/// directory until a free name is found. The counter is unbounded; callers
/// must not assume any upper limit on N.
///
/// # Examples
///
/// ```no_run
/// use dirshelf::mover::resolve_collision;
/// use std::path::Path;
///
/// let target = resolve_collision(Path::new("/data/Images/photo.jpg"));
/// // "/data/Images/photo.jpg" if free, else "/data/Images/photo_copy1.jpg", ...
/// ```
pub fn resolve_collision(desired: &Path) -> PathBuf {
    if !desired.exists() {
        return desired.to_path_buf();
    }

    let stem = desired
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = desired.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = desired.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1;
    loop {
        let candidate_name = match &extension {
            Some(ext) => format!("{stem}_copy{counter}.{ext}"),
            None => format!("{stem}_copy{counter}"),
        };
        let candidate = parent.join(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Moves `source` to `desired` (or a collision-resolved sibling of it) and
/// returns where the file actually landed.
///
/// A plain rename is attempted first; if the filesystem rejects it (the
/// cross-volume case), the file is copied and the source removed. Any
/// remaining failure is returned as a [`MoveError`].
pub fn move_file(source: &Path, desired: &Path) -> Result<PathBuf, MoveError> {
    let destination = resolve_collision(desired);

    if fs::rename(source, &destination).is_err() {
        fs::copy(source, &destination).map_err(|e| MoveError {
            source: source.to_path_buf(),
            destination: destination.clone(),
            error: e,
        })?;
        fs::remove_file(source).map_err(|e| MoveError {
            source: source.to_path_buf(),
            destination: destination.clone(),
            error: e,
        })?;
    }

    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_free_path_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join("file.txt");
        assert_eq!(resolve_collision(&desired), desired);
    }

    #[test]
    fn test_resolve_taken_path_appends_copy_suffix() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join("file.txt");
        fs::write(&desired, "taken").expect("Failed to write file");

        let resolved = resolve_collision(&desired);
        assert_eq!(resolved, temp_dir.path().join("file_copy1.txt"));
    }

    #[test]
    fn test_resolve_increments_counter_until_free() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join("file.txt");
        fs::write(&desired, "taken").expect("Failed to write file");
        fs::write(temp_dir.path().join("file_copy1.txt"), "also taken")
            .expect("Failed to write file");

        let resolved = resolve_collision(&desired);
        assert_eq!(resolved, temp_dir.path().join("file_copy2.txt"));
    }

    #[test]
    fn test_resolve_keeps_candidate_in_destination_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let category_dir = temp_dir.path().join("Images");
        fs::create_dir(&category_dir).expect("Failed to create directory");
        let desired = category_dir.join("photo.jpg");
        fs::write(&desired, "taken").expect("Failed to write file");

        let resolved = resolve_collision(&desired);
        assert_eq!(resolved.parent(), Some(category_dir.as_path()));
    }

    #[test]
    fn test_resolve_file_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join("README");
        fs::write(&desired, "taken").expect("Failed to write file");

        let resolved = resolve_collision(&desired);
        assert_eq!(resolved, temp_dir.path().join("README_copy1"));
    }

    #[test]
    fn test_move_file_relocates_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("note.txt");
        fs::write(&source, "hello").expect("Failed to write file");
        let target_dir = temp_dir.path().join("Documents");
        fs::create_dir(&target_dir).expect("Failed to create directory");

        let landed = move_file(&source, &target_dir.join("note.txt")).expect("Move failed");

        assert!(!source.exists());
        assert_eq!(landed, target_dir.join("note.txt"));
        assert_eq!(
            fs::read_to_string(&landed).expect("Failed to read file"),
            "hello"
        );
    }

    #[test]
    fn test_move_file_never_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("note.txt");
        fs::write(&source, "new").expect("Failed to write file");
        let target_dir = temp_dir.path().join("Documents");
        fs::create_dir(&target_dir).expect("Failed to create directory");
        let occupied = target_dir.join("note.txt");
        fs::write(&occupied, "old").expect("Failed to write file");

        let landed = move_file(&source, &occupied).expect("Move failed");

        assert_eq!(landed, target_dir.join("note_copy1.txt"));
        assert_eq!(
            fs::read_to_string(&occupied).expect("Failed to read file"),
            "old"
        );
        assert_eq!(
            fs::read_to_string(&landed).expect("Failed to read file"),
            "new"
        );
    }

    #[test]
    fn test_move_file_missing_source_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("gone.txt");
        let desired = temp_dir.path().join("dest.txt");

        let result = move_file(&source, &desired);
        assert!(result.is_err());
    }
}
