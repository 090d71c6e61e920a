//! Read-only archive inspection.

use std::path::Path;

use crate::Result;
use crate::formats::ArchiveType;
use crate::formats::EntryKind;
use crate::formats::resolve_input_format;
use crate::formats::visit_archive;
use crate::security::resolve_entry;

/// Depth limit applied when judging entry names during inspection.
const INSPECT_MAX_DEPTH: usize = 32;

/// One archive entry as declared by the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    /// Entry name exactly as stored (untrusted).
    pub name: String,
    /// Declared kind.
    pub kind: EntryKind,
    /// Declared uncompressed size in bytes.
    pub size: u64,
    /// Whether extraction would materialize this entry without a guard
    /// failure. Links and special files are never materialized and are
    /// reported as safe only if their name is.
    pub safe: bool,
}

/// Lists the entries of `archive_path` without writing anything.
///
/// Unsafe names are reported through [`EntrySummary::safe`] instead of
/// failing the call.
///
/// # Errors
///
/// Returns `UnsupportedFormat`, `ArchiveCorrupt` or `Io` as extraction
/// would.
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::list_entries;
///
/// # fn main() -> Result<(), stagehand_core::StageError> {
/// for entry in list_entries("upload.zip", None)? {
///     let marker = if entry.safe { " " } else { "!" };
///     println!("{marker} {} {}", entry.size, entry.name);
/// }
/// # Ok(())
/// # }
/// ```
pub fn list_entries(
    archive_path: impl AsRef<Path>,
    format: Option<ArchiveType>,
) -> Result<Vec<EntrySummary>> {
    let archive_path = archive_path.as_ref();
    let format = resolve_input_format(archive_path, format)?;

    let mut entries = Vec::new();
    visit_archive(archive_path, format, |entry| {
        let safe = resolve_entry(Path::new(""), entry.name, INSPECT_MAX_DEPTH)
            .is_ok_and(|p| entry.kind == EntryKind::Directory || !p.is_root());
        entries.push(EntrySummary {
            name: entry.name.to_owned(),
            kind: entry.kind,
            size: entry.size,
            safe,
        });
        Ok(())
    })?;
    Ok(entries)
}
