//! Directory lifecycle: idempotent creation and tolerant removal.
//!
//! [`ensure_directory`] is strict and propagates every failure.
//! [`remove_tree`] is tolerant: cleanup never fails the caller, it reports a
//! [`RemoveOutcome`] and logs anything that went wrong.

mod workdir;

pub use workdir::WorkDir;
pub use workdir::WorkRoot;

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;
use tracing::warn;

use crate::Result;
use crate::StageError;

/// Creates `path` and all missing ancestors.
///
/// Succeeds without doing anything if `path` is already a directory.
///
/// # Errors
///
/// Returns `Io` for any other failure, including a non-directory already
/// sitting at `path`.
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::lifecycle::ensure_directory;
///
/// # fn main() -> Result<(), stagehand_core::StageError> {
/// ensure_directory("/srv/staging/course-7/week-2")?;
/// ensure_directory("/srv/staging/course-7/week-2")?; // no-op
/// # Ok(())
/// # }
/// ```
pub fn ensure_directory(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|e| {
        StageError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot create directory {}: {e}", path.display()),
        ))
    })?;
    debug!(path = %path.display(), "directory ensured");
    Ok(())
}

/// What [`remove_tree`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The path existed and was removed.
    Removed,
    /// Nothing existed at the path.
    Missing,
    /// Removal failed; the failure was logged and the tree may be partially
    /// deleted.
    Failed,
}

impl RemoveOutcome {
    /// True for `Removed` and `Missing`: nothing is left at the path.
    #[must_use]
    pub const fn is_clean(self) -> bool {
        matches!(self, Self::Removed | Self::Missing)
    }
}

/// Recursively deletes `path`.
///
/// A missing path counts as success. A regular file or symlink at `path` is
/// removed itself; a symlink is never followed. Every other failure is
/// logged at `warn` level and swallowed.
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::lifecycle::{RemoveOutcome, remove_tree};
///
/// let outcome = remove_tree("/srv/staging/course-7");
/// assert!(matches!(outcome, RemoveOutcome::Removed | RemoveOutcome::Missing));
/// ```
pub fn remove_tree(path: impl AsRef<Path>) -> RemoveOutcome {
    let path = path.as_ref();

    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "remove_tree: nothing to remove");
            return RemoveOutcome::Missing;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "remove_tree: cannot inspect path");
            return RemoveOutcome::Failed;
        }
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            debug!(path = %path.display(), "tree removed");
            RemoveOutcome::Removed
        }
        // Raced with another remover; the end state is the same.
        Err(e) if e.kind() == ErrorKind::NotFound => RemoveOutcome::Missing,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "remove_tree: removal failed");
            RemoveOutcome::Failed
        }
    }
}
