//! Guarded path type for archive entries.

use std::path::Path;
use std::path::PathBuf;

/// An archive entry path that passed the path guard.
///
/// `SafePath` can only be produced by
/// [`resolve_entry`](crate::security::resolve_entry); there is no
/// `From<PathBuf>`. It carries both the normalized relative name and the
/// absolute location inside the destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath {
    relative: PathBuf,
    resolved: PathBuf,
}

impl SafePath {
    pub(crate) fn new(relative: PathBuf, resolved: PathBuf) -> Self {
        Self { relative, resolved }
    }

    /// Absolute location inside the destination directory.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.resolved
    }

    /// Normalized path relative to the destination directory.
    #[inline]
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// True when the entry name normalized to nothing (`""`, `"./"`), so it
    /// designates the destination itself.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// Converts into the absolute `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.resolved
    }
}
