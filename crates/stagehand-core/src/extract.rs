//! Archive extraction into a destination directory.

use std::path::Path;
use std::time::Instant;

use tracing::info;
use tracing::instrument;

use crate::ExtractConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::formats::EntryKind;
use crate::formats::common::EntryWriter;
use crate::formats::resolve_input_format;
use crate::formats::visit_archive;
use crate::types::DestDir;

/// Extracts `archive_path` into `destination_dir` without resource limits.
///
/// Entry names are still checked. Any tree produced by [`build`](crate::build)
/// extracts back, however deep or large it is. Use [`extract_with_config`] with
/// [`ExtractConfig::default`] to cap size, file count and depth for
/// untrusted uploads.
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::extract;
///
/// # fn main() -> Result<(), stagehand_core::StageError> {
/// let report = extract("upload.zip", "/srv/staging/upload-42")?;
/// println!("extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract(
    archive_path: impl AsRef<Path>,
    destination_dir: impl AsRef<Path>,
) -> Result<ExtractionReport> {
    extract_with_config(archive_path, destination_dir, &ExtractConfig::unlimited())
}

/// Extracts `archive_path` into `destination_dir`.
///
/// The destination is created if missing. Entries are materialized in
/// archive order; directory entries become directories, file entries are
/// streamed to disk, and link or special entries are skipped with a warning
/// in the report.
///
/// # Errors
///
/// - `UnsupportedFormat` if the format is neither configured nor detectable
/// - `PathTraversal` if any entry name escapes the destination
/// - `ArchiveCorrupt` if the archive cannot be decoded
/// - `QuotaExceeded` if a configured limit is hit
/// - `Io` for filesystem failures, including a missing archive
///
/// Extraction stops at the first error. Whatever was written before that
/// stays in place and the destination must be treated as dirty; see
/// [`StageError::leaves_partial_output`](crate::StageError::leaves_partial_output).
#[instrument(skip_all, fields(archive = %archive_path.as_ref().display()))]
pub fn extract_with_config(
    archive_path: impl AsRef<Path>,
    destination_dir: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<ExtractionReport> {
    let archive_path = archive_path.as_ref();
    config.validate()?;
    let format = resolve_input_format(archive_path, config.format)?;
    let dest = DestDir::create(destination_dir.as_ref())?;

    let start = Instant::now();
    let mut writer = EntryWriter::new(&dest, config);
    visit_archive(archive_path, format, |entry| match entry.kind {
        EntryKind::Directory => writer.directory(entry.name),
        EntryKind::File => writer.file(entry.name, entry.data),
        EntryKind::Symlink | EntryKind::Hardlink | EntryKind::Special => {
            writer.skip(entry.name, entry.kind);
            Ok(())
        }
    })?;
    let report = writer.finish(start.elapsed());

    info!(
        %format,
        destination = %dest.as_path().display(),
        files = report.files_extracted,
        directories = report.directories_created,
        bytes = report.bytes_written,
        skipped = report.entries_skipped,
        "archive extracted"
    );
    Ok(report)
}
