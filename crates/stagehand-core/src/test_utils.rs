//! Helpers for building in-memory test archives.
//!
//! Hostile entry names (`../`, absolute paths) cannot be produced through
//! the `tar` crate's path setters, so [`TarTestBuilder::add_raw_file`]
//! writes the name bytes into the header directly.
//!
//! # Panics
//!
//! Every function panics on I/O errors; they are meant for tests only.
//! Available to other crates with the `test-utils` feature.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

/// Creates an in-memory TAR archive from `(path, content)` pairs.
///
/// # Examples
///
/// ```
/// use stagehand_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(&[("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// assert!(!tar_data.is_empty());
/// ```
#[must_use]
pub fn create_test_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    entries
        .iter()
        .fold(TarTestBuilder::new(), |builder, &(path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Creates an in-memory ZIP archive from `(path, content)` pairs.
///
/// Names are stored verbatim, including hostile ones.
///
/// # Examples
///
/// ```
/// use stagehand_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(&[("../../evil.txt", b"x")]);
/// assert!(!zip_data.is_empty());
/// ```
#[must_use]
pub fn create_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    entries
        .iter()
        .fold(ZipTestBuilder::new(), |builder, &(path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Writes `data` to `path` and returns `path`, for fixtures on disk.
pub fn write_archive<'a>(path: &'a Path, data: &[u8]) -> &'a Path {
    std::fs::write(path, data).unwrap();
    path
}

/// Builder for TAR test archives with arbitrary entry types.
///
/// # Examples
///
/// ```
/// use stagehand_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .add_symlink("link", "file.txt")
///     .add_raw_file("../escape.txt", b"x")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a regular file whose name is copied into the header unchecked.
    ///
    /// `name` must fit in the 100-byte name field.
    #[must_use]
    pub fn add_raw_file(mut self, name: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        let bytes = name.as_bytes();
        header.as_gnu_mut().unwrap().name[..bytes.len()].copy_from_slice(bytes);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(self, path: &str) -> Self {
        self.add_empty(path, tar::EntryType::Directory, 0o755, None)
    }

    /// Adds a symlink.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.add_empty(path, tar::EntryType::Symlink, 0o777, Some(target))
    }

    /// Adds a hard link.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.add_empty(path, tar::EntryType::Link, 0o644, Some(target))
    }

    /// Adds a FIFO.
    #[must_use]
    pub fn add_fifo(self, path: &str) -> Self {
        self.add_empty(path, tar::EntryType::Fifo, 0o644, None)
    }

    fn add_empty(
        mut self,
        path: &str,
        entry_type: tar::EntryType,
        mode: u32,
        link: Option<&str>,
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(mode);
        header.set_entry_type(entry_type);
        if let Some(target) = link {
            header.set_link_name(target).unwrap();
        }
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for ZIP test archives.
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);
        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symlink entry.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let options = zip::write::SimpleFileOptions::default();
        self.zip.add_symlink(path, target, options).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
