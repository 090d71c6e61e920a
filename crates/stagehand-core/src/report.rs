//! Operation reports for extraction and archive building.

use std::time::Duration;

/// Report of an archive extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Entries that were not materialized (links, devices, ...).
    pub entries_skipped: usize,

    /// Duration of the extraction.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns total number of items materialized.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Report of an archive build.
///
/// # Examples
///
/// ```
/// use stagehand_core::BuildReport;
///
/// let mut report = BuildReport::default();
/// report.bytes_read = 1024;
/// report.archive_size = 256;
/// assert_eq!(report.compression_ratio(), 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Number of files added to the archive.
    pub files_added: usize,

    /// Total bytes read from the source tree (uncompressed).
    pub bytes_read: u64,

    /// Size of the finished archive on disk.
    pub archive_size: u64,

    /// Files left out of the archive.
    pub files_skipped: usize,

    /// Duration of the build.
    pub duration: Duration,

    /// Warnings generated during the build.
    pub warnings: Vec<String>,
}

impl BuildReport {
    /// Creates a new empty build report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Uncompressed over compressed size. `0.0` for an empty archive.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.archive_size as f64
    }
}
