//! Archive extraction, archive building and working-directory staging.
//!
//! `stagehand-core` materializes archives (ZIP, tar, tar.gz) into directory
//! trees and packs trees back into archives. Every entry name coming out of
//! an archive is checked against the destination before anything touches
//! disk, so hostile archives cannot write outside the directory they are
//! extracted into.
//!
//! # Examples
//!
//! ```no_run
//! use stagehand_core::{ExtensionFilter, WorkRoot, build, extract, list_files};
//!
//! # fn main() -> Result<(), stagehand_core::StageError> {
//! let root = WorkRoot::new("/srv/staging")?;
//! let work = root.stage_unique("upload-")?;
//!
//! extract("upload.zip", work.path())?;
//! let notebooks = list_files(work.path(), &ExtensionFilter::new([".ipynb"]))?;
//! println!("{} notebooks", notebooks.len());
//!
//! build(work.path(), "/srv/exports/upload.tar.gz")?;
//! // `work` is removed when it goes out of scope.
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod build;
pub mod cache;
pub mod config;
pub mod copy;
pub mod enumerate;
pub mod error;
pub mod extract;
pub mod fileio;
pub mod formats;
pub mod inspect;
pub mod lifecycle;
pub mod nonblocking;
pub mod report;
pub mod security;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use build::build;
pub use build::build_with_config;
pub use cache::ListingCache;
pub use config::BuildConfig;
pub use config::ExtractConfig;
pub use enumerate::list_files;
pub use error::QuotaResource;
pub use error::Result;
pub use error::StageError;
pub use extract::extract;
pub use extract::extract_with_config;
pub use fileio::FileKind;
pub use fileio::FileStat;
pub use formats::ArchiveType;
pub use formats::EntryKind;
pub use formats::detect_format;
pub use formats::detect_from_header;
pub use inspect::EntrySummary;
pub use inspect::list_entries;
pub use lifecycle::RemoveOutcome;
pub use lifecycle::WorkDir;
pub use lifecycle::WorkRoot;
pub use lifecycle::ensure_directory;
pub use lifecycle::remove_tree;
pub use report::BuildReport;
pub use report::ExtractionReport;
pub use types::DestDir;
pub use types::ExtensionFilter;
pub use types::FileRecord;
pub use types::SafePath;
