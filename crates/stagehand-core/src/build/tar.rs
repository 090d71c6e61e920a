//! TAR writer, used directly and underneath gzip.

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::io::{self};
use std::io::Write;
use std::time::UNIX_EPOCH;

use tar::Builder;
use tar::Header;
use tracing::debug;

use super::Member;
use crate::BuildReport;
use crate::Result;

/// Writes `members` as a TAR stream and returns the underlying writer.
///
/// Entries carry mode `0o644` and the source modification time; owner and
/// group are left empty.
pub(crate) fn write_tar<W: Write>(
    writer: W,
    members: &[Member],
    report: &mut BuildReport,
) -> Result<W> {
    let mut builder = Builder::new(writer);

    for member in members {
        let file = File::open(&member.path)?;
        let metadata = file.metadata()?;
        let size = metadata.len();

        let mut header = Header::new_gnu();
        header.set_size(size);
        header.set_mode(0o644);
        if let Some(mtime) = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        {
            header.set_mtime(mtime.as_secs());
        }

        // The header size is fixed; a file growing mid-build must not spill.
        let mut data = SizedReader::new(file.take(size), size);
        builder.append_data(&mut header, &member.name, &mut data)?;

        report.files_added += 1;
        report.bytes_read += data.read;
        debug!(entry = %member.name, bytes = data.read, "file added");
    }

    Ok(builder.into_inner()?)
}

/// Counts bytes read and fails if the source ends before `expected`, so a
/// file that shrinks mid-build cannot leave a short entry behind its header.
struct SizedReader<R> {
    inner: R,
    expected: u64,
    read: u64,
}

impl<R> SizedReader<R> {
    fn new(inner: R, expected: u64) -> Self {
        Self {
            inner,
            expected,
            read: 0,
        }
    }
}

impl<R: Read> Read for SizedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() && self.read < self.expected {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "file shrank while archiving: {} of {} bytes",
                    self.read, self.expected
                ),
            ));
        }
        self.read += n as u64;
        Ok(n)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_write_tar_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        let members = vec![Member {
            path,
            name: "b/data.csv".to_string(),
        }];
        let mut report = BuildReport::new();

        let bytes = write_tar(Vec::new(), &members, &mut report).unwrap();
        assert_eq!(report.files_added, 1);

        let mut archive = tar::Archive::new(Cursor::new(bytes));
        let mut entry = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(&*entry.path_bytes(), b"b/data.csv");
        assert_eq!(entry.header().mode().unwrap(), 0o644);
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "a,b\n1,2\n");
    }

    #[test]
    fn test_write_tar_long_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f.txt");
        std::fs::write(&path, "x").unwrap();
        let name = format!("{}/f.txt", "d".repeat(150));
        let members = vec![Member {
            path,
            name: name.clone(),
        }];

        let bytes = write_tar(Vec::new(), &members, &mut BuildReport::new()).unwrap();
        let mut archive = tar::Archive::new(Cursor::new(bytes));
        let entry = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(entry.path_bytes().as_ref(), name.as_bytes());
    }

    #[test]
    fn test_write_tar_counts_copied_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f.bin");
        std::fs::write(&path, vec![1u8; 1500]).unwrap();
        let members = vec![Member {
            path,
            name: "f.bin".to_string(),
        }];
        let mut report = BuildReport::new();

        write_tar(Vec::new(), &members, &mut report).unwrap();
        assert_eq!(report.bytes_read, 1500);
    }

    #[test]
    fn test_sized_reader_rejects_short_source() {
        let mut reader = SizedReader::new(Cursor::new(vec![0u8; 10]), 16);
        let err = std::io::copy(&mut reader, &mut std::io::sink()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert_eq!(reader.read, 10);

        let mut exact = SizedReader::new(Cursor::new(vec![0u8; 16]), 16);
        assert_eq!(std::io::copy(&mut exact, &mut std::io::sink()).unwrap(), 16);
    }
}
