//! Async wrappers that run the blocking operations on tokio's blocking pool.
//!
//! Each function takes owned arguments, moves them into
//! [`tokio::task::spawn_blocking`] and awaits the result, so callers on an
//! async runtime never block a worker thread on disk I/O. Semantics and
//! errors are those of the synchronous function of the same name.

use std::path::PathBuf;

use crate::BuildConfig;
use crate::BuildReport;
use crate::ExtractConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::StageError;
use crate::fileio::FileStat;
use crate::lifecycle::RemoveOutcome;
use crate::types::ExtensionFilter;
use crate::types::FileRecord;

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| StageError::Io(std::io::Error::other(format!("blocking task failed: {e}"))))?
}

/// See [`crate::extract`].
pub async fn extract(
    archive_path: impl Into<PathBuf>,
    destination_dir: impl Into<PathBuf>,
) -> Result<ExtractionReport> {
    let archive_path = archive_path.into();
    let destination_dir = destination_dir.into();
    run_blocking(move || crate::extract(archive_path, destination_dir)).await
}

/// See [`crate::extract_with_config`].
pub async fn extract_with_config(
    archive_path: impl Into<PathBuf>,
    destination_dir: impl Into<PathBuf>,
    config: ExtractConfig,
) -> Result<ExtractionReport> {
    let archive_path = archive_path.into();
    let destination_dir = destination_dir.into();
    run_blocking(move || crate::extract_with_config(archive_path, destination_dir, &config)).await
}

/// See [`crate::build`].
pub async fn build(
    source_dir: impl Into<PathBuf>,
    output_path: impl Into<PathBuf>,
) -> Result<BuildReport> {
    let source_dir = source_dir.into();
    let output_path = output_path.into();
    run_blocking(move || crate::build(source_dir, output_path)).await
}

/// See [`crate::build_with_config`].
pub async fn build_with_config(
    source_dir: impl Into<PathBuf>,
    output_path: impl Into<PathBuf>,
    config: BuildConfig,
) -> Result<BuildReport> {
    let source_dir = source_dir.into();
    let output_path = output_path.into();
    run_blocking(move || crate::build_with_config(source_dir, output_path, &config)).await
}

/// See [`crate::list_files`].
pub async fn list_files(
    root_dir: impl Into<PathBuf>,
    filter: ExtensionFilter,
) -> Result<Vec<FileRecord>> {
    let root_dir = root_dir.into();
    run_blocking(move || crate::list_files(root_dir, &filter)).await
}

/// See [`crate::ensure_directory`].
pub async fn ensure_directory(path: impl Into<PathBuf>) -> Result<()> {
    let path = path.into();
    run_blocking(move || crate::ensure_directory(path)).await
}

/// See [`crate::remove_tree`]. A task that panics reports
/// [`RemoveOutcome::Failed`].
pub async fn remove_tree(path: impl Into<PathBuf>) -> RemoveOutcome {
    let path = path.into();
    tokio::task::spawn_blocking(move || crate::remove_tree(path))
        .await
        .unwrap_or(RemoveOutcome::Failed)
}

/// See [`crate::fileio::copy`].
pub async fn copy(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Result<u64> {
    let src = src.into();
    let dest = dest.into();
    run_blocking(move || crate::fileio::copy(src, dest)).await
}

/// See [`crate::fileio::read_text`].
pub async fn read_text(path: impl Into<PathBuf>) -> Result<String> {
    let path = path.into();
    run_blocking(move || crate::fileio::read_text(path)).await
}

/// See [`crate::fileio::write_text`].
pub async fn write_text(path: impl Into<PathBuf>, content: impl Into<String>) -> Result<()> {
    let path = path.into();
    let content = content.into();
    run_blocking(move || crate::fileio::write_text(path, &content)).await
}

/// See [`crate::fileio::stat`].
pub async fn stat(path: impl Into<PathBuf>) -> Result<FileStat> {
    let path = path.into();
    run_blocking(move || crate::fileio::stat(path)).await
}

/// See [`crate::fileio::exists`].
pub async fn exists(path: impl Into<PathBuf>) -> bool {
    let path = path.into();
    tokio::task::spawn_blocking(move || crate::fileio::exists(path))
        .await
        .unwrap_or(false)
}
