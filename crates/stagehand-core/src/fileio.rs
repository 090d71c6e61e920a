//! Thin file operations with the crate's error model.
//!
//! Writers create missing parent directories. Every failure is `Io` with
//! the path in the message, except [`exists`], which never fails.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use crate::Result;
use crate::StageError;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::lifecycle::ensure_directory;

/// What a path points at, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Anything else (socket, device, FIFO).
    Other,
}

/// Metadata snapshot returned by [`stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
    /// Kind of filesystem object.
    pub kind: FileKind,
}

/// Copies `src` to `dest`, creating `dest`'s parent directory if needed.
///
/// Returns the number of bytes copied. An existing `dest` is overwritten.
pub fn copy(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    let mut input = File::open(src).map_err(|e| with_path(e, "cannot open", src))?;
    ensure_parent(dest)?;
    let mut output = File::create(dest).map_err(|e| with_path(e, "cannot create", dest))?;
    copy_with_buffer(&mut input, &mut output, &mut CopyBuffer::new())
}

/// Reads `path` as UTF-8 text.
///
/// Invalid UTF-8 is reported as `Io` with kind `InvalidData`.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| with_path(e, "cannot read", path))
}

/// Writes `content` to `path` as UTF-8, replacing any existing file.
pub fn write_text(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    std::fs::write(path, content).map_err(|e| with_path(e, "cannot write", path))
}

/// Returns size, modification time and kind of `path`. Symlinks are
/// reported as themselves, not followed.
pub fn stat(path: impl AsRef<Path>) -> Result<FileStat> {
    let path = path.as_ref();
    let metadata = std::fs::symlink_metadata(path).map_err(|e| with_path(e, "cannot stat", path))?;
    let file_type = metadata.file_type();
    let kind = if file_type.is_symlink() {
        FileKind::Symlink
    } else if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_file() {
        FileKind::File
    } else {
        FileKind::Other
    };
    Ok(FileStat {
        size: metadata.len(),
        modified: metadata.modified().ok(),
        kind,
    })
}

/// Returns `true` if something exists at `path`.
///
/// A dangling symlink exists. Permission errors and other access failures
/// yield `false`.
pub fn exists(path: impl AsRef<Path>) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

fn with_path(err: std::io::Error, action: &str, path: &Path) -> StageError {
    let kind = err.kind();
    let message = if kind == ErrorKind::InvalidData {
        format!("{action} {}: not valid UTF-8", path.display())
    } else {
        format!("{action} {}: {err}", path.display())
    };
    StageError::Io(std::io::Error::new(kind, message))
}
