//! Configuration for extraction and archive building.

use crate::Result;
use crate::StageError;
use crate::formats::ArchiveType;

/// Extraction limits for [`extract_with_config`](crate::extract_with_config).
///
/// Archive content is always treated as hostile: traversal checks cannot be
/// disabled, only the resource limits are tunable. The default limits suit
/// untrusted uploads; plain [`extract`](crate::extract) runs with
/// [`ExtractConfig::unlimited`].
///
/// # Examples
///
/// ```
/// use stagehand_core::ExtractConfig;
///
/// let config = ExtractConfig::default()
///     .with_max_file_count(500)
///     .with_max_total_size(64 * 1024 * 1024);
/// assert_eq!(config.max_file_count, 500);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Maximum size for a single file in bytes.
    pub max_file_size: u64,

    /// Maximum total size for all extracted files in bytes.
    pub max_total_size: u64,

    /// Maximum number of files that can be extracted.
    pub max_file_count: usize,

    /// Maximum number of components in an entry path.
    pub max_path_depth: usize,

    /// Archive format override. `None` detects from the file extension.
    pub format: Option<ArchiveType>,
}

impl Default for ExtractConfig {
    /// Default values:
    /// - `max_file_size`: 50 MB
    /// - `max_total_size`: 500 MB
    /// - `max_file_count`: 10,000
    /// - `max_path_depth`: 32
    /// - `format`: `None` (detect)
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_total_size: 500 * 1024 * 1024,
            max_file_count: 10_000,
            max_path_depth: 32,
            format: None,
        }
    }
}

impl ExtractConfig {
    /// Creates a new `ExtractConfig` with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifts every resource limit. Path traversal checks still apply.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_file_size: u64::MAX,
            max_total_size: u64::MAX,
            max_file_count: usize::MAX,
            max_path_depth: usize::MAX,
            format: None,
        }
    }

    /// Sets the maximum single file size.
    #[must_use]
    pub fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = max;
        self
    }

    /// Sets the maximum total extracted size.
    #[must_use]
    pub fn with_max_total_size(mut self, max: u64) -> Self {
        self.max_total_size = max;
        self
    }

    /// Sets the maximum number of extracted files.
    #[must_use]
    pub fn with_max_file_count(mut self, max: usize) -> Self {
        self.max_file_count = max;
        self
    }

    /// Sets the maximum entry path depth.
    #[must_use]
    pub fn with_max_path_depth(mut self, max: usize) -> Self {
        self.max_path_depth = max;
        self
    }

    /// Forces the archive format instead of detecting it.
    #[must_use]
    pub fn with_format(mut self, format: Option<ArchiveType>) -> Self {
        self.format = format;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_path_depth == 0 {
            return Err(StageError::InvalidConfiguration(
                "max_path_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for building an archive from a directory.
///
/// # Examples
///
/// ```
/// use stagehand_core::BuildConfig;
///
/// let config = BuildConfig::default().with_compression_level(Some(6));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Compression level (0-9). `Some(0)` stores entries uncompressed,
    /// `None` uses the codec default.
    ///
    /// Default: `Some(9)` (maximum).
    pub compression_level: Option<u8>,

    /// Archive format. `None` detects from the output file extension.
    pub format: Option<ArchiveType>,

    /// Include files and directories whose name starts with `.`.
    ///
    /// Default: `true`, the source tree is archived unfiltered.
    pub include_hidden: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(9),
            format: None,
            include_hidden: true,
        }
    }
}

impl BuildConfig {
    /// Creates a new `BuildConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets the archive format.
    #[must_use]
    pub fn with_format(mut self, format: Option<ArchiveType>) -> Self {
        self.format = format;
        self
    }

    /// Sets whether hidden files are archived.
    #[must_use]
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the compression level is above 9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(StageError::InvalidConfiguration(format!(
                "compression level must be 0-9, got {level}"
            )));
        }
        Ok(())
    }
}
