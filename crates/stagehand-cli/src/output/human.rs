//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use stagehand_core::BuildReport;
use stagehand_core::EntryKind;
use stagehand_core::EntrySummary;
use stagehand_core::ExtractionReport;
use stagehand_core::FileRecord;
use stagehand_core::RemoveOutcome;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn headline(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn warnings(&self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{}", style("Warnings:").yellow().bold()));
        } else {
            let _ = self.term.write_line("Warnings:");
        }
        for warning in warnings {
            let _ = self.term.write_line(&format!("  - {warning}"));
        }
    }

    const fn kind_char(kind: EntryKind) -> &'static str {
        match kind {
            EntryKind::File => "-",
            EntryKind::Directory => "d",
            EntryKind::Symlink => "l",
            EntryKind::Hardlink => "h",
            EntryKind::Special => "s",
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, destination: &Path, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Extraction complete: {}", destination.display()));
        let _ = self.term.write_line(&format!(
            "  Files extracted: {}",
            Self::format_number(report.files_extracted)
        ));
        let _ = self
            .term
            .write_line(&format!("  Directories: {}", report.directories_created));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));
        if report.entries_skipped > 0 {
            let _ = self
                .term
                .write_line(&format!("  Entries skipped: {}", report.entries_skipped));
        }
        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        self.warnings(&report.warnings);
        Ok(())
    }

    fn format_build_result(&self, output_path: &Path, report: &BuildReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Archive built: {}", output_path.display()));
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_read)
        ));
        let _ = self.term.write_line(&format!(
            "  Archive size:     {}",
            Self::format_size(report.archive_size)
        ));
        if report.files_skipped > 0 {
            let _ = self
                .term
                .write_line(&format!("  Files skipped:    {}", report.files_skipped));
        }
        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Ratio:            {:.2}",
                report.compression_ratio()
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        self.warnings(&report.warnings);
        Ok(())
    }

    fn format_file_list(
        &self,
        root: &Path,
        records: &[FileRecord],
        human_readable: bool,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for record in records {
            let shown = record.relative_to(root).unwrap_or(&record.path);
            if self.verbose || human_readable {
                let size = if human_readable {
                    Self::format_size(record.size)
                } else {
                    record.size.to_string()
                };
                let _ = self
                    .term
                    .write_line(&format!("{size:>10}  {}", shown.display()));
            } else {
                let _ = self.term.write_line(&format!("{}", shown.display()));
            }
        }

        if self.verbose {
            let total: u64 = records.iter().map(|r| r.size).sum();
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "Total: {} files, {}",
                Self::format_number(records.len()),
                Self::format_size(total)
            ));
        }
        Ok(())
    }

    fn format_entries(&self, _archive: &Path, entries: &[EntrySummary]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            let marker = if entry.safe {
                " ".to_string()
            } else if self.use_colors {
                style("!").red().bold().to_string()
            } else {
                "!".to_string()
            };
            let _ = self.term.write_line(&format!(
                "{marker} {} {:>10}  {}",
                Self::kind_char(entry.kind),
                entry.size,
                entry.name
            ));
        }

        let unsafe_count = entries.iter().filter(|e| !e.safe).count();
        let total: u64 = entries.iter().map(|e| e.size).sum();
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {}",
            Self::format_number(entries.len()),
            Self::format_size(total)
        ));
        if unsafe_count > 0 {
            let message = format!("{unsafe_count} entries would be rejected on extraction");
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
            } else {
                let _ = self.term.write_line(&format!("WARNING: {message}"));
            }
        }
        Ok(())
    }

    fn format_clean_result(&self, path: &Path, outcome: RemoveOutcome) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        match outcome {
            RemoveOutcome::Removed => self.headline(&format!("Removed {}", path.display())),
            RemoveOutcome::Missing => {
                let _ = self
                    .term
                    .write_line(&format!("Nothing to remove at {}", path.display()));
            }
            RemoveOutcome::Failed => {}
        }
        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Errors are shown even in quiet mode.
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("Error:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("Error: {error:?}"));
        }
    }
}
