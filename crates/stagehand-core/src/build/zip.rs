//! ZIP writer.

use std::fs::File;
use std::io::Seek;
use std::io::Write;

use tracing::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

use super::Member;
use crate::BuildReport;
use crate::Result;
use crate::StageError;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;

/// Writes `members` as a ZIP archive and returns the finished writer.
pub(crate) fn write_zip<W: Write + Seek>(
    writer: W,
    members: &[Member],
    compression_level: Option<u8>,
    report: &mut BuildReport,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = file_options(compression_level);
    let mut buffer = CopyBuffer::new();

    for member in members {
        let mut file = File::open(&member.path)?;
        let size = file.metadata()?.len();

        zip.start_file(member.name.as_str(), options.large_file(size >= u64::from(u32::MAX)))
            .map_err(|e| write_error(&member.name, e))?;
        let copied = copy_with_buffer(&mut file, &mut zip, &mut buffer)?;

        report.files_added += 1;
        report.bytes_read += copied;
        debug!(entry = %member.name, bytes = copied, "file added");
    }

    zip.finish()
        .map_err(|e| StageError::Io(std::io::Error::other(format!("failed to finish ZIP archive: {e}"))))
}

/// `Some(0)` stores entries, anything else deflates at that level.
fn file_options(compression_level: Option<u8>) -> SimpleFileOptions {
    match compression_level {
        Some(0) => SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        level => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(level.map(i64::from)),
    }
}

fn write_error(name: &str, err: ZipError) -> StageError {
    match err {
        ZipError::Io(e) => StageError::Io(e),
        other => StageError::Io(std::io::Error::other(format!(
            "failed to add {name} to ZIP archive: {other}"
        ))),
    }
}
