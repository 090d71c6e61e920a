//! ZIP entry reader.

use std::io::ErrorKind;
use std::io::Read;
use std::io::Seek;

use zip::ZipArchive;
use zip::read::ZipFile;
use zip::result::ZipError;

use super::EntryKind;
use super::RawEntry;
use crate::Result;
use crate::StageError;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Walks the central directory in order and visits every entry.
pub(crate) fn visit_entries<R, F>(reader: R, mut visit: F) -> Result<()>
where
    R: Read + Seek,
    F: FnMut(RawEntry<'_>) -> Result<()>,
{
    let mut archive = ZipArchive::new(reader).map_err(map_zip_error)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(map_zip_error)?;
        let name = entry.name().to_owned();
        let kind = entry_kind(&entry);
        let size = entry.size();
        visit(RawEntry {
            name: &name,
            kind,
            size,
            data: &mut entry,
        })?;
    }

    Ok(())
}

fn entry_kind<R: Read>(entry: &ZipFile<'_, R>) -> EntryKind {
    if entry.is_dir() {
        return EntryKind::Directory;
    }
    match entry.unix_mode() {
        Some(mode) if mode & S_IFMT == S_IFLNK => EntryKind::Symlink,
        _ => EntryKind::File,
    }
}

/// Underlying I/O failures stay `Io`, unless they are a short read of the
/// archive itself; everything the decoder rejects is `ArchiveCorrupt`.
fn map_zip_error(err: ZipError) -> StageError {
    match err {
        ZipError::Io(e) if e.kind() == ErrorKind::UnexpectedEof => {
            StageError::ArchiveCorrupt(format!("truncated ZIP archive: {e}"))
        }
        ZipError::Io(e) => StageError::Io(e),
        other => StageError::ArchiveCorrupt(format!("invalid ZIP archive: {other}")),
    }
}
