//! Error conversion utilities for CLI.
//!
//! Converts stagehand-core's typed errors (thiserror) into user-facing
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use stagehand_core::StageError;
use std::path::Path;

/// Converts `StageError` to an anyhow error that names `subject`, the
/// archive or directory the command was working on.
pub fn convert_stage_error(err: StageError, subject: &Path) -> anyhow::Error {
    match err {
        StageError::PathTraversal { path } => {
            anyhow!(
                "Security violation: '{}' contains an entry that escapes the destination: '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.\n\
                 HINT: Files written before the rejected entry were left in place.",
                subject.display(),
                path.display()
            )
        }
        StageError::SecurityViolation { reason } => {
            anyhow!(
                "Security violation in '{}': {}\n\
                 HINT: Use --max-depth to allow deeper entry paths if the archive is trusted.",
                subject.display(),
                reason
            )
        }
        StageError::QuotaExceeded { resource } => {
            anyhow!(
                "Extraction limit exceeded for '{}': {}\n\
                 HINT: Use --max-files, --max-total-size, or --max-file-size to increase limits.",
                subject.display(),
                resource
            )
        }
        StageError::UnsupportedFormat => {
            anyhow!(
                "Archive format not supported: {}\n\
                 HINT: Supported formats: zip, tar, tar.gz (tgz). Use --format to override detection.",
                subject.display()
            )
        }
        StageError::ArchiveCorrupt(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or truncated.",
                subject.display(),
                reason
            )
        }
        StageError::SourceNotFound { path } => {
            anyhow!("Source directory not found: {}", path.display())
        }
        StageError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                subject.display(),
                io_err
            )
        }
        StageError::InvalidConfiguration(reason) => anyhow!("Invalid configuration: {reason}"),
    }
}

/// Adds subject context to a library result.
pub fn add_context<T>(result: Result<T, StageError>, subject: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_stage_error(e, subject))
}
