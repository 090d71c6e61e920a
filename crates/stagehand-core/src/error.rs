//! Error types for staging, extraction and archive building.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `StageError`.
pub type Result<T> = std::result::Result<T, StageError>;

/// Represents a specific quota resource that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// File count quota exceeded.
    FileCount {
        /// Current file count.
        current: usize,
        /// Maximum allowed file count.
        max: usize,
    },
    /// Total size quota exceeded.
    TotalSize {
        /// Current total size in bytes.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// Single file size quota exceeded.
    FileSize {
        /// File size in bytes.
        size: u64,
        /// Maximum allowed file size in bytes.
        max: u64,
    },
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCount { current, max } => {
                write!(f, "quota exceeded: file count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::FileSize { size, max } => {
                write!(f, "quota exceeded: single file size ({size} > {max})")
            }
        }
    }
}

/// Errors raised by the staging subsystem.
///
/// Cleanup is the one place that never produces this type: see
/// [`remove_tree`](crate::lifecycle::remove_tree), which reports a
/// [`RemoveOutcome`](crate::lifecycle::RemoveOutcome) instead.
#[derive(Error, Debug)]
pub enum StageError {
    /// Filesystem-level failure (permission, missing required path, disk full).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is malformed or truncated.
    #[error("corrupt archive: {0}")]
    ArchiveCorrupt(String),

    /// An entry or input path escapes its intended root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path as supplied.
        path: PathBuf,
    },

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format")]
    UnsupportedFormat,

    /// Source path for an archive build does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// Extraction quota exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },

    /// Operation not permitted by security policy.
    #[error("operation denied by security policy: {reason}")]
    SecurityViolation {
        /// Reason for the violation.
        reason: String,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl StageError {
    /// Returns `true` if this error represents a security violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use stagehand_core::StageError;
    /// use std::path::PathBuf;
    ///
    /// let err = StageError::PathTraversal {
    ///     path: PathBuf::from("../../evil.txt"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = StageError::UnsupportedFormat;
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::QuotaExceeded { .. } | Self::SecurityViolation { .. }
        )
    }

    /// Returns `true` if the destination of a failed extraction must be
    /// treated as dirty and removed by the caller.
    ///
    /// Every extraction failure after the first write leaves partial output
    /// behind; only configuration and format errors are raised before any
    /// byte is written.
    #[must_use]
    pub const fn leaves_partial_output(&self) -> bool {
        !matches!(
            self,
            Self::UnsupportedFormat | Self::InvalidConfiguration(_) | Self::SourceNotFound { .. }
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use stagehand_core::StageError;
    ///
    /// let err = StageError::ArchiveCorrupt("bad central directory".to_string());
    /// assert_eq!(err.context(), Some("bad central directory"));
    ///
    /// let err = StageError::UnsupportedFormat;
    /// assert_eq!(err.context(), None);
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::ArchiveCorrupt(msg) | Self::InvalidConfiguration(msg) => Some(msg),
            Self::SecurityViolation { reason } => Some(reason),
            _ => None,
        }
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }
}
