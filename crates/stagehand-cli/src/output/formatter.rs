//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use stagehand_core::BuildReport;
use stagehand_core::EntrySummary;
use stagehand_core::ExtractionReport;
use stagehand_core::FileRecord;
use stagehand_core::RemoveOutcome;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format extraction result
    fn format_extraction_result(&self, destination: &Path, report: &ExtractionReport) -> Result<()>;

    /// Format archive build result
    fn format_build_result(&self, output_path: &Path, report: &BuildReport) -> Result<()>;

    /// Format a directory listing
    fn format_file_list(&self, root: &Path, records: &[FileRecord], human_readable: bool)
    -> Result<()>;

    /// Format archive entries
    fn format_entries(&self, archive: &Path, entries: &[EntrySummary]) -> Result<()>;

    /// Format the outcome of removing a tree
    fn format_clean_result(&self, path: &Path, outcome: RemoveOutcome) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
