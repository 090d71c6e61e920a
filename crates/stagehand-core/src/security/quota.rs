//! Extraction quota tracking.

use crate::ExtractConfig;
use crate::QuotaResource;
use crate::Result;
use crate::StageError;

/// Tracks resource usage during one extraction.
///
/// Sizes are checked against bytes actually produced by the decoder, so a
/// lying header cannot push an entry past the limits.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    files: usize,
    bytes: u64,
}

impl QuotaTracker {
    /// Creates a new quota tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of a new file entry.
    pub fn begin_file(&mut self, config: &ExtractConfig) -> Result<()> {
        self.files += 1;
        if self.files > config.max_file_count {
            return Err(StageError::QuotaExceeded {
                resource: QuotaResource::FileCount {
                    current: self.files,
                    max: config.max_file_count,
                },
            });
        }
        Ok(())
    }

    /// Records `chunk` more bytes for the current file, which has written
    /// `file_bytes` so far including this chunk.
    pub fn record_bytes(&mut self, chunk: u64, file_bytes: u64, config: &ExtractConfig) -> Result<()> {
        if file_bytes > config.max_file_size {
            return Err(StageError::QuotaExceeded {
                resource: QuotaResource::FileSize {
                    size: file_bytes,
                    max: config.max_file_size,
                },
            });
        }

        self.bytes = self.bytes.saturating_add(chunk);
        if self.bytes > config.max_total_size {
            return Err(StageError::QuotaExceeded {
                resource: QuotaResource::TotalSize {
                    current: self.bytes,
                    max: config.max_total_size,
                },
            });
        }
        Ok(())
    }

    /// Returns the number of files started.
    #[must_use]
    pub fn files(&self) -> usize {
        self.files
    }

    /// Returns the total bytes recorded.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}
