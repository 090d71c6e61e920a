//! TAR entry reader, used for plain and gzip-compressed archives.

use std::io::Read;

use super::EntryKind;
use super::RawEntry;
use crate::Result;
use crate::StageError;

/// Streams the archive and visits every entry in order.
///
/// Extension headers (pax, GNU long names) are folded into the entries
/// they describe and never reach the visitor.
pub(crate) fn visit_entries<R, F>(reader: R, mut visit: F) -> Result<()>
where
    R: Read,
    F: FnMut(RawEntry<'_>) -> Result<()>,
{
    let mut archive = ::tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| StageError::ArchiveCorrupt(format!("failed to read TAR entries: {e}")))?;

    for entry in entries {
        let mut entry = entry
            .map_err(|e| StageError::ArchiveCorrupt(format!("failed to read TAR entry: {e}")))?;

        let Some(kind) = entry_kind(entry.header().entry_type()) else {
            continue;
        };
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
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

/// `None` for metadata-only headers.
fn entry_kind(entry_type: ::tar::EntryType) -> Option<EntryKind> {
    use ::tar::EntryType;

    match entry_type {
        EntryType::Directory => Some(EntryKind::Directory),
        EntryType::Symlink => Some(EntryKind::Symlink),
        EntryType::Link => Some(EntryKind::Hardlink),
        EntryType::Char | EntryType::Block | EntryType::Fifo => Some(EntryKind::Special),
        EntryType::XGlobalHeader
        | EntryType::XHeader
        | EntryType::GNULongName
        | EntryType::GNULongLink => None,
        // Regular, Continuous, GNUSparse and unknown vendor types carry data.
        _ => Some(EntryKind::File),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::create_test_tar;
    use flate2::Compression;
    use flate2::read::GzDecoder;
    use flate2::write::GzEncoder;
    use std::io::Cursor;
    use std::io::Write;

    fn collect<R: Read>(reader: R) -> Result<Vec<(String, EntryKind, u64)>> {
        let mut seen = Vec::new();
        visit_entries(reader, |entry| {
            seen.push((entry.name.to_owned(), entry.kind, entry.size));
            Ok(())
        })?;
        Ok(seen)
    }

    #[test]
    fn test_visit_plain_tar() {
        let data = create_test_tar(&[("a/1.txt", b"x"), ("b/2.csv", b"yz")]);
        let seen = collect(Cursor::new(data)).unwrap();
        assert_eq!(
            seen,
            vec![
                ("a/1.txt".to_string(), EntryKind::File, 1),
                ("b/2.csv".to_string(), EntryKind::File, 2),
            ]
        );
    }

    #[test]
    fn test_visit_gzip_tar() {
        let data = create_test_tar(&[("notes.md", b"hello")]);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data).unwrap();
        let compressed = encoder.finish().unwrap();

        let seen = collect(GzDecoder::new(Cursor::new(compressed))).unwrap();
        assert_eq!(seen, vec![("notes.md".to_string(), EntryKind::File, 5)]);
    }

    #[test]
    fn test_link_and_special_kinds() {
        let data = TarTestBuilder::new()
            .add_directory("dir/")
            .add_symlink("dir/link", "../etc/passwd")
            .add_hardlink("dir/hard", "dir/link")
            .add_fifo("dir/pipe")
            .build();
        let kinds: Vec<EntryKind> = collect(Cursor::new(data))
            .unwrap()
            .into_iter()
            .map(|e| e.1)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EntryKind::Directory,
                EntryKind::Symlink,
                EntryKind::Hardlink,
                EntryKind::Special,
            ]
        );
    }

    #[test]
    fn test_entry_data_is_readable() {
        let data = create_test_tar(&[("f.txt", b"content")]);
        let mut content = Vec::new();
        visit_entries(Cursor::new(data), |entry| {
            entry.data.read_to_end(&mut content)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(content, b"content");
    }

    #[test]
    fn test_corrupt_gzip() {
        let result = collect(GzDecoder::new(Cursor::new(b"not gzip data".to_vec())));
        assert!(matches!(result, Err(StageError::ArchiveCorrupt(_))));
    }

    #[test]
    fn test_truncated_tar() {
        let data = create_test_tar(&[("big.bin", &[7u8; 4096])]);
        let truncated = data[..1024].to_vec();
        let result = visit_entries(Cursor::new(truncated), |entry| {
            let mut sink = Vec::new();
            entry.data.read_to_end(&mut sink).map_err(|e| {
                StageError::ArchiveCorrupt(format!("failed to read entry data: {e}"))
            })?;
            Ok(())
        });
        assert!(matches!(result, Err(StageError::ArchiveCorrupt(_))));
    }
}
