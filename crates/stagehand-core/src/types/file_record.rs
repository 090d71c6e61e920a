//! File records produced by directory enumeration.

use std::fs::Metadata;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

/// Snapshot of one regular file found during enumeration.
///
/// The record is a read-only view: it is stale as soon as the filesystem
/// changes underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path of the file.
    pub path: PathBuf,

    /// Lower-cased, dot-prefixed extension (`".pdf"`), if any.
    pub extension: Option<String>,

    /// Size in bytes.
    pub size: u64,

    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
}

impl FileRecord {
    pub(crate) fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()));
        Self {
            extension,
            size: metadata.len(),
            modified: metadata.modified().ok(),
            path,
        }
    }

    /// Path of the file relative to `root`, if it lies under it.
    #[must_use]
    pub fn relative_to(&self, root: &Path) -> Option<&Path> {
        self.path.strip_prefix(root).ok()
    }
}
