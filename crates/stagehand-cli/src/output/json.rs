//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use stagehand_core::BuildReport;
use stagehand_core::EntrySummary;
use stagehand_core::ExtractionReport;
use stagehand_core::FileRecord;
use stagehand_core::RemoveOutcome;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::time::UNIX_EPOCH;

pub struct JsonFormatter {
    quiet: bool,
}

impl JsonFormatter {
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn success<T: Serialize>(&self, operation: &str, data: T) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::output(&JsonOutput::success(operation, data))
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, destination: &Path, report: &ExtractionReport) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput<'a> {
            destination: String,
            files_extracted: usize,
            directories_created: usize,
            bytes_written: u64,
            entries_skipped: usize,
            duration_ms: u128,
            warnings: &'a [String],
        }

        self.success(
            "extract",
            ExtractionOutput {
                destination: destination.display().to_string(),
                files_extracted: report.files_extracted,
                directories_created: report.directories_created,
                bytes_written: report.bytes_written,
                entries_skipped: report.entries_skipped,
                duration_ms: report.duration.as_millis(),
                warnings: &report.warnings,
            },
        )
    }

    fn format_build_result(&self, output_path: &Path, report: &BuildReport) -> Result<()> {
        #[derive(Serialize)]
        struct BuildOutput<'a> {
            output_path: String,
            files_added: usize,
            bytes_read: u64,
            archive_size: u64,
            compression_ratio: f64,
            files_skipped: usize,
            duration_ms: u128,
            warnings: &'a [String],
        }

        self.success(
            "build",
            BuildOutput {
                output_path: output_path.display().to_string(),
                files_added: report.files_added,
                bytes_read: report.bytes_read,
                archive_size: report.archive_size,
                compression_ratio: report.compression_ratio(),
                files_skipped: report.files_skipped,
                duration_ms: report.duration.as_millis(),
                warnings: &report.warnings,
            },
        )
    }

    fn format_file_list(
        &self,
        root: &Path,
        records: &[FileRecord],
        _human_readable: bool,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct FileOutput {
            path: String,
            extension: Option<String>,
            size: u64,
            modified_unix: Option<u64>,
        }

        #[derive(Serialize)]
        struct ListOutput {
            root: String,
            total_files: usize,
            total_size: u64,
            files: Vec<FileOutput>,
        }

        let files = records
            .iter()
            .map(|record| FileOutput {
                path: record.path.display().to_string(),
                extension: record.extension.clone(),
                size: record.size,
                modified_unix: record
                    .modified
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_secs()),
            })
            .collect();

        self.success(
            "list-files",
            ListOutput {
                root: root.display().to_string(),
                total_files: records.len(),
                total_size: records.iter().map(|r| r.size).sum(),
                files,
            },
        )
    }

    fn format_entries(&self, archive: &Path, entries: &[EntrySummary]) -> Result<()> {
        #[derive(Serialize)]
        struct EntryOutput<'a> {
            name: &'a str,
            kind: String,
            size: u64,
            safe: bool,
        }

        #[derive(Serialize)]
        struct InspectOutput<'a> {
            archive: String,
            total_entries: usize,
            unsafe_entries: usize,
            entries: Vec<EntryOutput<'a>>,
        }

        self.success(
            "inspect",
            InspectOutput {
                archive: archive.display().to_string(),
                total_entries: entries.len(),
                unsafe_entries: entries.iter().filter(|e| !e.safe).count(),
                entries: entries
                    .iter()
                    .map(|e| EntryOutput {
                        name: &e.name,
                        kind: e.kind.to_string(),
                        size: e.size,
                        safe: e.safe,
                    })
                    .collect(),
            },
        )
    }

    fn format_clean_result(&self, path: &Path, outcome: RemoveOutcome) -> Result<()> {
        #[derive(Serialize)]
        struct CleanOutput {
            path: String,
            outcome: &'static str,
        }

        let outcome = match outcome {
            RemoveOutcome::Removed => "removed",
            RemoveOutcome::Missing => "missing",
            RemoveOutcome::Failed => "failed",
        };
        self.success(
            "clean",
            CleanOutput {
                path: path.display().to_string(),
                outcome,
            },
        )
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
