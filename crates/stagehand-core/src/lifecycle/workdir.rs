//! Working directories staged under an application-controlled root.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use super::RemoveOutcome;
use super::ensure_directory;
use super::remove_tree;
use crate::Result;
use crate::StageError;
use crate::security::resolve;
use crate::types::DestDir;

/// The application-controlled directory under which working directories
/// are staged.
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::WorkRoot;
///
/// # fn main() -> Result<(), stagehand_core::StageError> {
/// let root = WorkRoot::new("/srv/staging")?;
/// let work = root.stage("submission-1187")?;
/// // ... extract, enumerate, rebuild ...
/// work.cleanup();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WorkRoot {
    root: DestDir,
}

impl WorkRoot {
    /// Creates the root if needed and pins it to its canonical path.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            root: DestDir::create(root)?,
        })
    }

    /// Canonical path of the root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.as_path()
    }

    /// Resolves `relative` inside the root without creating anything.
    ///
    /// # Errors
    ///
    /// Returns `PathTraversal` if `relative` is absolute or escapes the root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        resolve(self.root.as_path(), relative.as_ref())
    }

    /// Creates (or reuses) the working directory `name` under the root.
    ///
    /// `name` may contain several segments (`"course-7/week-2"`).
    ///
    /// # Errors
    ///
    /// - `PathTraversal` if `name` escapes the root, designates the root
    ///   itself, or reaches outside it through an existing symlink
    /// - `Io` if the directory cannot be created
    pub fn stage(&self, name: impl AsRef<Path>) -> Result<WorkDir> {
        let name = name.as_ref();
        let path = self.resolve(name)?;
        if path == self.root.as_path() {
            return Err(StageError::PathTraversal {
                path: name.to_path_buf(),
            });
        }
        if !self.root.contains_on_disk(&path)? {
            return Err(StageError::PathTraversal {
                path: name.to_path_buf(),
            });
        }

        ensure_directory(&path)?;
        debug!(path = %path.display(), "working directory staged");
        Ok(WorkDir::new(path))
    }

    /// Creates a fresh working directory with a unique name starting with
    /// `prefix`.
    pub fn stage_unique(&self, prefix: &str) -> Result<WorkDir> {
        let path = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(self.root.as_path())
            .map_err(|e| {
                StageError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "cannot create working directory in {}: {e}",
                        self.root.as_path().display()
                    ),
                ))
            })?
            .keep();
        debug!(path = %path.display(), "unique working directory staged");
        Ok(WorkDir::new(path))
    }
}

/// A staged working directory.
///
/// The tree is removed by [`cleanup`](Self::cleanup) or, failing that, when
/// the value is dropped. [`persist`](Self::persist) hands the path over to
/// the caller and disarms removal.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    armed: bool,
}

impl WorkDir {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// Absolute path of the working directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves `relative` inside this working directory.
    ///
    /// # Errors
    ///
    /// Returns `PathTraversal` if `relative` is absolute or escapes.
    pub fn join(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        resolve(&self.path, relative.as_ref())
    }

    /// Removes the tree now. Never fails; see [`remove_tree`].
    pub fn cleanup(mut self) -> RemoveOutcome {
        self.armed = false;
        remove_tree(&self.path)
    }

    /// Keeps the tree on disk and returns its path.
    #[must_use]
    pub fn persist(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl AsRef<Path> for WorkDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if self.armed {
            let _ = remove_tree(&self.path);
        }
    }
}
