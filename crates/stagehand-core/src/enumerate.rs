//! Recursive file enumeration with an extension filter.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::Result;
use crate::StageError;
use crate::types::ExtensionFilter;
use crate::types::FileRecord;

/// Lists every regular file under `root_dir` that matches `filter`.
///
/// Traversal is depth-first pre-order: a subdirectory is fully listed
/// before its later siblings, and siblings are visited in file name order.
/// Symlinks and special files are neither followed nor returned. Paths in
/// the result are absolute.
///
/// # Errors
///
/// Returns `Io` if `root_dir` is missing or not a directory, or if any
/// directory below it cannot be read. No partial list is returned.
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::{ExtensionFilter, list_files};
///
/// # fn main() -> Result<(), stagehand_core::StageError> {
/// let notebooks = list_files("/srv/staging/course-7", &ExtensionFilter::new([".ipynb"]))?;
/// for record in &notebooks {
///     println!("{} ({} bytes)", record.path.display(), record.size);
/// }
/// # Ok(())
/// # }
/// ```
pub fn list_files(root_dir: impl AsRef<Path>, filter: &ExtensionFilter) -> Result<Vec<FileRecord>> {
    let root = std::path::absolute(root_dir.as_ref())?;

    let metadata = std::fs::metadata(&root).map_err(|e| {
        StageError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot enumerate {}: {e}", root.display()),
        ))
    })?;
    if !metadata.is_dir() {
        return Err(StageError::Io(std::io::Error::new(
            ErrorKind::NotADirectory,
            format!("not a directory: {}", root.display()),
        )));
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() || !filter.matches(entry.path()) {
            continue;
        }
        let metadata = entry.metadata().map_err(walk_error)?;
        records.push(FileRecord::from_metadata(entry.into_path(), &metadata));
    }

    debug!(
        root = %root.display(),
        filter = ?filter.suffixes(),
        files = records.len(),
        "directory enumerated"
    );
    Ok(records)
}

fn walk_error(err: walkdir::Error) -> StageError {
    let kind = err.io_error().map_or(ErrorKind::Other, std::io::Error::kind);
    let message = match err.path() {
        Some(path) => format!("cannot enumerate {}: {err}", path.display()),
        None => format!("cannot enumerate: {err}"),
    };
    StageError::Io(std::io::Error::new(kind, message))
}
