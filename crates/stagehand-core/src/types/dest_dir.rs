//! Validated destination directory type.

use crate::Result;
use crate::StageError;
use crate::lifecycle::ensure_directory;
use std::path::Path;
use std::path::PathBuf;

/// A destination directory that exists and is held as a canonical path.
///
/// Every extracted entry is resolved against this path, and the on-disk
/// location of each parent directory is compared against it after
/// symlinks are resolved.
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/srv/staging/upload-42")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Wraps an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the path does not exist, is not a directory, or
    /// cannot be canonicalized.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path).map_err(|e| {
            StageError::Io(std::io::Error::new(
                e.kind(),
                format!("destination directory unavailable {}: {e}", path.display()),
            ))
        })?;

        if !metadata.is_dir() {
            return Err(StageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            StageError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {e}", path.display()),
            ))
        })?;

        Ok(Self(canonical))
    }

    /// Creates the directory (and missing ancestors) if needed, then wraps it.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_directory(&path)?;
        Self::new(path)
    }

    /// Returns the canonical path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Checks that `path`, once symlinks are resolved, still lies inside
    /// this directory.
    ///
    /// Walks up to the deepest existing ancestor, so it can be called
    /// before the directories for an entry are created.
    pub(crate) fn contains_on_disk(&self, path: &Path) -> Result<bool> {
        let mut ancestor = path;
        loop {
            match ancestor.canonicalize() {
                Ok(canonical) => return Ok(canonical.starts_with(&self.0)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => match ancestor.parent() {
                    Some(parent) => ancestor = parent,
                    None => return Ok(false),
                },
                Err(e) => return Err(StageError::Io(e)),
            }
        }
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
