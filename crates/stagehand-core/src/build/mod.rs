//! Archive building from a directory tree.
//!
//! The source tree is enumerated once, up front, so the member list is
//! fixed before the output file is opened.

mod tar;
mod zip;

use std::fs::File;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::debug;
use tracing::info;
use tracing::instrument;

use crate::BuildConfig;
use crate::BuildReport;
use crate::Result;
use crate::StageError;
use crate::enumerate::list_files;
use crate::formats::ArchiveType;
use crate::formats::resolve_format;
use crate::lifecycle::ensure_directory;
use crate::types::ExtensionFilter;

/// One file going into the archive.
#[derive(Debug)]
pub(crate) struct Member {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Forward-slash name relative to the source root.
    pub name: String,
}

/// Builds an archive of `source_dir` at `output_path` with default settings
/// (maximum compression, format from the output extension).
///
/// See [`build_with_config`].
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::build;
///
/// # fn main() -> Result<(), stagehand_core::StageError> {
/// let report = build("/srv/staging/course-7", "/srv/exports/course-7.zip")?;
/// println!("{} files, {} bytes", report.files_added, report.archive_size);
/// # Ok(())
/// # }
/// ```
pub fn build(source_dir: impl AsRef<Path>, output_path: impl AsRef<Path>) -> Result<BuildReport> {
    build_with_config(source_dir, output_path, &BuildConfig::default())
}

/// Builds an archive containing every regular file under `source_dir`.
///
/// Entry names are relative to `source_dir` and always use `/`. The parent
/// of `output_path` is created if needed and an existing file at
/// `output_path` is replaced. If the output lies inside the source tree it
/// is not archived into itself. Empty directories are not recorded.
///
/// The archive is finalized and flushed before this returns.
///
/// # Errors
///
/// - `SourceNotFound` if `source_dir` does not exist
/// - `UnsupportedFormat` if the format is neither configured nor detectable
/// - `InvalidConfiguration` for an out-of-range compression level
/// - `Io` if the source cannot be read or the output cannot be written
#[instrument(skip_all, fields(source = %source_dir.as_ref().display()))]
pub fn build_with_config(
    source_dir: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &BuildConfig,
) -> Result<BuildReport> {
    let source_dir = source_dir.as_ref();
    let output_path = output_path.as_ref();
    config.validate()?;
    let format = resolve_format(output_path, config.format)?;

    let source = canonical_source(source_dir)?;
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_directory(parent)?;
    }
    let output = canonical_output(output_path)?;

    let start = Instant::now();
    let mut report = BuildReport::new();
    let members = collect_members(&source, &output, config, &mut report)?;

    let file = File::create(output_path).map_err(|e| {
        StageError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot create {}: {e}", output_path.display()),
        ))
    })?;
    let writer = BufWriter::new(file);

    match format {
        ArchiveType::Zip => {
            let mut writer = zip::write_zip(writer, &members, config.compression_level, &mut report)?;
            writer.flush()?;
        }
        ArchiveType::Tar => {
            let mut writer = tar::write_tar(writer, &members, &mut report)?;
            writer.flush()?;
        }
        ArchiveType::TarGz => {
            let encoder = GzEncoder::new(writer, gzip_level(config.compression_level));
            let mut writer = tar::write_tar(encoder, &members, &mut report)?.finish()?;
            writer.flush()?;
        }
    }

    report.archive_size = std::fs::metadata(output_path)?.len();
    report.duration = start.elapsed();

    info!(
        %format,
        output = %output_path.display(),
        files = report.files_added,
        skipped = report.files_skipped,
        bytes = report.bytes_read,
        archive_size = report.archive_size,
        "archive built"
    );
    Ok(report)
}

fn canonical_source(source_dir: &Path) -> Result<PathBuf> {
    let metadata = std::fs::metadata(source_dir).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            StageError::SourceNotFound {
                path: source_dir.to_path_buf(),
            }
        } else {
            StageError::Io(e)
        }
    })?;
    if !metadata.is_dir() {
        return Err(StageError::Io(std::io::Error::new(
            ErrorKind::NotADirectory,
            format!("source is not a directory: {}", source_dir.display()),
        )));
    }
    Ok(source_dir.canonicalize()?)
}

/// Canonical location of the output file, which may not exist yet.
fn canonical_output(output_path: &Path) -> Result<PathBuf> {
    let file_name = output_path.file_name().ok_or_else(|| {
        StageError::Io(std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("output path has no file name: {}", output_path.display()),
        ))
    })?;
    let parent = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.canonicalize()?,
        _ => std::env::current_dir()?,
    };
    Ok(parent.join(file_name))
}

fn collect_members(
    source: &Path,
    output: &Path,
    config: &BuildConfig,
    report: &mut BuildReport,
) -> Result<Vec<Member>> {
    let mut members = Vec::new();
    for record in list_files(source, &ExtensionFilter::any())? {
        if record.path == output {
            debug!(path = %record.path.display(), "output file skipped");
            report.files_skipped += 1;
            continue;
        }
        let Some(relative) = record.relative_to(source) else {
            continue;
        };
        if !config.include_hidden && is_hidden(relative) {
            report.files_skipped += 1;
            continue;
        }
        let Some(name) = archive_name(relative) else {
            report.files_skipped += 1;
            report.add_warning(format!(
                "skipped file with non UTF-8 name: {}",
                record.path.display()
            ));
            continue;
        };
        members.push(Member {
            path: record.path,
            name,
        });
    }
    Ok(members)
}

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(part) => part.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Joins the components of `relative` with `/`.
fn archive_name(relative: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    parts.map(|p| p.join("/"))
}

fn gzip_level(level: Option<u8>) -> Compression {
    match level {
        None => Compression::default(),
        Some(n) => Compression::new(u32::from(n)),
    }
}
