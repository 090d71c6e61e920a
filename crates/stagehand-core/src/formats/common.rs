//! Entry materialization shared by every archive format.
//!
//! [`EntryWriter`] is the only code that writes extracted data. Each entry
//! goes through the same sequence: strict name check, quota accounting,
//! parent creation with an on-disk containment check, then a buffered copy.

use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;
use tracing::warn;

use super::EntryKind;
use crate::ExtractConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::StageError;
use crate::copy::COPY_BUFFER_SIZE;
use crate::copy::CopyBuffer;
use crate::copy::copy_entry;
use crate::lifecycle::ensure_directory;
use crate::security::QuotaTracker;
use crate::security::resolve_entry;
use crate::types::DestDir;

/// Writes archive entries under a destination directory.
pub(crate) struct EntryWriter<'a> {
    dest: &'a DestDir,
    config: &'a ExtractConfig,
    quota: QuotaTracker,
    buffer: CopyBuffer,
    report: ExtractionReport,
}

impl<'a> EntryWriter<'a> {
    pub(crate) fn new(dest: &'a DestDir, config: &'a ExtractConfig) -> Self {
        Self {
            dest,
            config,
            quota: QuotaTracker::new(),
            buffer: CopyBuffer::new(),
            report: ExtractionReport::new(),
        }
    }

    /// Materializes a directory entry.
    ///
    /// A name that designates the destination itself (`"./"`) is ignored.
    pub(crate) fn directory(&mut self, name: &str) -> Result<()> {
        let safe = resolve_entry(self.dest.as_path(), name, self.config.max_path_depth)?;
        if safe.is_root() {
            debug!(entry = name, "directory entry names the destination, ignored");
            return Ok(());
        }

        self.check_on_disk(safe.as_path(), name)?;
        ensure_directory(safe.as_path())?;
        self.report.directories_created += 1;
        debug!(entry = name, "directory created");
        Ok(())
    }

    /// Materializes a file entry, streaming `data` to disk.
    ///
    /// An existing regular file at the target is truncated, so the last of
    /// several entries with the same name wins.
    pub(crate) fn file(&mut self, name: &str, data: &mut dyn Read) -> Result<()> {
        let safe = resolve_entry(self.dest.as_path(), name, self.config.max_path_depth)?;
        if safe.is_root() {
            return Err(StageError::ArchiveCorrupt(format!(
                "file entry has no usable name: {name:?}"
            )));
        }
        self.quota.begin_file(self.config)?;

        let target = safe.as_path();
        if let Some(parent) = target.parent() {
            self.check_on_disk(parent, name)?;
            ensure_directory(parent)?;
        }
        if std::fs::symlink_metadata(target).is_ok_and(|m| m.file_type().is_symlink()) {
            return Err(traversal(name));
        }

        let file = File::create(target).map_err(|e| {
            StageError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot create {}: {e}", target.display()),
            ))
        })?;
        let mut out = BufWriter::with_capacity(COPY_BUFFER_SIZE, file);

        let quota = &mut self.quota;
        let config = self.config;
        let written = copy_entry(data, &mut out, &mut self.buffer, |chunk, total| {
            quota.record_bytes(chunk, total, config)
        })?;
        out.flush()?;

        self.report.files_extracted += 1;
        self.report.bytes_written = self.report.bytes_written.saturating_add(written);
        debug!(entry = name, bytes = written, "file extracted");
        Ok(())
    }

    /// Records an entry that is deliberately not materialized.
    pub(crate) fn skip(&mut self, name: &str, kind: EntryKind) {
        warn!(entry = name, %kind, "entry skipped");
        self.report.entries_skipped += 1;
        self.report.add_warning(format!("skipped {kind}: {name}"));
    }

    pub(crate) fn finish(mut self, duration: Duration) -> ExtractionReport {
        self.report.duration = duration;
        self.report
    }

    /// Rejects `path` if an existing symlink on the way to it leads outside
    /// the destination.
    fn check_on_disk(&self, path: &Path, name: &str) -> Result<()> {
        if self.dest.contains_on_disk(path)? {
            Ok(())
        } else {
            Err(traversal(name))
        }
    }
}

fn traversal(name: &str) -> StageError {
    StageError::PathTraversal {
        path: PathBuf::from(name),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::QuotaResource;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn dest() -> (TempDir, DestDir) {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path()).unwrap();
        (temp, dest)
    }

    #[test]
    fn test_file_creates_parents() {
        let (_temp, dest) = dest();
        let config = ExtractConfig::default();
        let mut writer = EntryWriter::new(&dest, &config);

        writer
            .file("a/b/c.txt", &mut Cursor::new(b"hello".to_vec()))
            .unwrap();
        let report = writer.finish(Duration::ZERO);

        assert_eq!(
            fs::read_to_string(dest.as_path().join("a/b/c.txt")).unwrap(),
            "hello"
        );
        assert_eq!(report.files_extracted, 1);
        assert_eq!(report.bytes_written, 5);
    }

    #[test]
    fn test_zero_byte_file() {
        let (_temp, dest) = dest();
        let config = ExtractConfig::default();
        let mut writer = EntryWriter::new(&dest, &config);

        writer.file("empty.txt", &mut Cursor::new(Vec::new())).unwrap();
        let path = dest.as_path().join("empty.txt");
        assert!(path.is_file());
        assert_eq!(fs::metadata(path).unwrap().len(), 0);
    }

    #[test]
    fn test_duplicate_last_wins() {
        let (_temp, dest) = dest();
        let config = ExtractConfig::default();
        let mut writer = EntryWriter::new(&dest, &config);

        writer
            .file("dup.txt", &mut Cursor::new(b"first, longer".to_vec()))
            .unwrap();
        writer
            .file("dup.txt", &mut Cursor::new(b"second".to_vec()))
            .unwrap();
        assert_eq!(
            fs::read_to_string(dest.as_path().join("dup.txt")).unwrap(),
            "second"
        );
    }

    #[test]
    fn test_root_designators() {
        let (_temp, dest) = dest();
        let config = ExtractConfig::default();
        let mut writer = EntryWriter::new(&dest, &config);

        writer.directory("./").unwrap();
        let result = writer.file(".", &mut Cursor::new(b"x".to_vec()));
        assert!(matches!(result, Err(StageError::ArchiveCorrupt(_))));
        assert_eq!(writer.finish(Duration::ZERO).directories_created, 0);
    }

    #[test]
    fn test_traversal_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let safe = temp.path().join("safe");
        let dest = DestDir::create(&safe).unwrap();
        let config = ExtractConfig::default();
        let mut writer = EntryWriter::new(&dest, &config);

        let result = writer.file("../../evil.txt", &mut Cursor::new(b"x".to_vec()));
        assert!(matches!(result, Err(StageError::PathTraversal { .. })));
        assert!(!temp.path().join("evil.txt").exists());
        assert_eq!(fs::read_dir(&safe).unwrap().count(), 0);
    }

    #[test]
    fn test_quota_file_size_checked_on_stream() {
        let (_temp, dest) = dest();
        let config = ExtractConfig::default().with_max_file_size(10);
        let mut writer = EntryWriter::new(&dest, &config);

        let result = writer.file("big.bin", &mut Cursor::new(vec![0u8; 11]));
        assert!(matches!(
            result,
            Err(StageError::QuotaExceeded {
                resource: QuotaResource::FileSize { size: 11, max: 10 }
            })
        ));
    }

    #[test]
    fn test_skip_records_warning() {
        let (_temp, dest) = dest();
        let config = ExtractConfig::default();
        let mut writer = EntryWriter::new(&dest, &config);

        writer.skip("link", EntryKind::Symlink);
        let report = writer.finish(Duration::ZERO);
        assert_eq!(report.entries_skipped, 1);
        assert_eq!(report.warnings, vec!["skipped symlink: link".to_string()]);
    }

    #[test]
    #[cfg(unix)]
    fn test_existing_symlink_parent_rejected() {
        let outside = TempDir::new().unwrap();
        let (_temp, dest) = dest();
        std::os::unix::fs::symlink(outside.path(), dest.as_path().join("escape")).unwrap();
        let config = ExtractConfig::default();
        let mut writer = EntryWriter::new(&dest, &config);

        let result = writer.file("escape/owned.txt", &mut Cursor::new(b"x".to_vec()));
        assert!(matches!(result, Err(StageError::PathTraversal { .. })));
        assert!(!outside.path().join("owned.txt").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_existing_symlink_target_rejected() {
        let outside = TempDir::new().unwrap();
        let victim = outside.path().join("victim.txt");
        fs::write(&victim, "original").unwrap();
        let (_temp, dest) = dest();
        std::os::unix::fs::symlink(&victim, dest.as_path().join("file.txt")).unwrap();
        let config = ExtractConfig::default();
        let mut writer = EntryWriter::new(&dest, &config);

        let result = writer.file("file.txt", &mut Cursor::new(b"pwned".to_vec()));
        assert!(matches!(result, Err(StageError::PathTraversal { .. })));
        assert_eq!(fs::read_to_string(&victim).unwrap(), "original");
    }
}
