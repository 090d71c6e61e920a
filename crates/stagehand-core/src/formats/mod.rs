//! Archive formats: detection and per-format entry readers.
//!
//! Each reader walks its archive once and hands every entry to a visitor as
//! a [`RawEntry`]. Extraction and inspection are two visitors over the same
//! walk.

pub(crate) mod common;
pub(crate) mod tar;
pub(crate) mod zip;

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::Result;
use crate::StageError;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveType {
    /// ZIP archive.
    Zip,
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
}

impl ArchiveType {
    /// Canonical file extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Detects the archive type from the file name of `path`, ignoring case.
///
/// A bare `.gz` is not a tar archive and is rejected. Extraction and
/// inspection fall back to [`detect_from_header`] when the name is not
/// recognized.
///
/// # Errors
///
/// Returns `UnsupportedFormat` if the extension is not recognized.
///
/// # Examples
///
/// ```
/// use stagehand_core::formats::{ArchiveType, detect_format};
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("bundle.ZIP")).unwrap(), ArchiveType::Zip);
/// assert_eq!(detect_format(Path::new("x.tgz")).unwrap(), ArchiveType::TarGz);
/// assert!(detect_format(Path::new("notes.gz")).is_err());
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveType> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .ok_or(StageError::UnsupportedFormat)?;

    if name.ends_with(".zip") {
        Ok(ArchiveType::Zip)
    } else if name.ends_with(".tar") {
        Ok(ArchiveType::Tar)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Ok(ArchiveType::TarGz)
    } else {
        Err(StageError::UnsupportedFormat)
    }
}

/// Kind of an archive entry, as declared by its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link. Never materialized.
    Symlink,
    /// Hard link. Never materialized.
    Hardlink,
    /// Device, FIFO or other special file. Never materialized.
    Special,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Hardlink => "hardlink",
            Self::Special => "special file",
        })
    }
}

/// One entry as read from the archive. `name` is untrusted.
pub(crate) struct RawEntry<'a> {
    pub name: &'a str,
    pub kind: EntryKind,
    pub size: u64,
    pub data: &'a mut dyn Read,
}

/// Opens `path` and feeds every entry to `visit`, in archive order.
pub(crate) fn visit_archive<F>(path: &Path, format: ArchiveType, visit: F) -> Result<()>
where
    F: FnMut(RawEntry<'_>) -> Result<()>,
{
    let file = File::open(path).map_err(|e| {
        StageError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot open archive {}: {e}", path.display()),
        ))
    })?;
    let reader = BufReader::new(file);

    match format {
        ArchiveType::Zip => zip::visit_entries(reader, visit),
        ArchiveType::Tar => tar::visit_entries(reader, visit),
        ArchiveType::TarGz => tar::visit_entries(GzDecoder::new(reader), visit),
    }
}

/// Recognizes an archive from its leading bytes.
///
/// Covers local ZIP headers (and the end record of an empty ZIP), the gzip
/// magic, and the `ustar` magic of POSIX and GNU tar headers.
///
/// # Examples
///
/// ```
/// use stagehand_core::formats::{ArchiveType, detect_from_header};
///
/// assert_eq!(detect_from_header(b"PK\x03\x04rest"), Some(ArchiveType::Zip));
/// assert_eq!(detect_from_header(&[0x1f, 0x8b, 0x08]), Some(ArchiveType::TarGz));
/// assert_eq!(detect_from_header(b"plain text"), None);
/// ```
#[must_use]
pub fn detect_from_header(header: &[u8]) -> Option<ArchiveType> {
    match header {
        [0x50, 0x4b, 0x03, 0x04, ..] | [0x50, 0x4b, 0x05, 0x06, ..] => Some(ArchiveType::Zip),
        [0x1f, 0x8b, ..] => Some(ArchiveType::TarGz),
        _ if header.get(257..262) == Some(b"ustar".as_slice()) => Some(ArchiveType::Tar),
        _ => None,
    }
}

/// Reads the first block of `path` and recognizes it with
/// [`detect_from_header`].
fn sniff_format(path: &Path) -> Result<Option<ArchiveType>> {
    let mut header = Vec::with_capacity(TAR_BLOCK_SIZE);
    File::open(path)
        .and_then(|file| file.take(TAR_BLOCK_SIZE as u64).read_to_end(&mut header))
        .map_err(|e| {
            StageError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot open archive {}: {e}", path.display()),
            ))
        })?;
    Ok(detect_from_header(&header))
}

const TAR_BLOCK_SIZE: usize = 512;

/// Format of an existing archive: `explicit` if set, then the file name,
/// then the leading bytes. Uploads are often stored without an extension.
pub(crate) fn resolve_input_format(
    path: &Path,
    explicit: Option<ArchiveType>,
) -> Result<ArchiveType> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    match detect_format(path) {
        Ok(format) => Ok(format),
        Err(StageError::UnsupportedFormat) => {
            let sniffed = sniff_format(path)?;
            debug!(path = %path.display(), format = ?sniffed, "format detected from content");
            sniffed.ok_or(StageError::UnsupportedFormat)
        }
        Err(e) => Err(e),
    }
}

/// Returns `explicit` if set, otherwise detects from `path`.
pub(crate) fn resolve_format(path: &Path, explicit: Option<ArchiveType>) -> Result<ArchiveType> {
    match explicit {
        Some(format) => Ok(format),
        None => detect_format(path),
    }
}
