//! Buffered copying through a reusable 64 KiB buffer.
//!
//! Every byte that moves between an archive and the filesystem goes through
//! a [`CopyBuffer`], so memory use per operation stays fixed regardless of
//! entry size.

use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::io::{self};

use crate::Result;
use crate::StageError;

/// Buffer size for streaming I/O (64 KiB).
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap-allocated, reusable copy buffer.
///
/// One buffer is allocated per extraction or build and reused for every
/// entry.
///
/// # Examples
///
/// ```no_run
/// use stagehand_core::copy::{CopyBuffer, copy_with_buffer};
///
/// # fn main() -> Result<(), stagehand_core::StageError> {
/// let mut buffer = CopyBuffer::new();
/// let mut input = std::fs::File::open("input.txt")?;
/// let mut output = std::fs::File::create("output.txt")?;
///
/// let bytes = copy_with_buffer(&mut input, &mut output, &mut buffer)?;
/// println!("copied {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Allocates a zeroed buffer of [`COPY_BUFFER_SIZE`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `reader` into `writer` and returns the number of bytes copied.
///
/// Read and write failures are both reported as `Io`.
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let mut total: u64 = 0;
    loop {
        let n = fill(reader, &mut buffer.buf)?;
        if n == 0 {
            return Ok(total);
        }
        writer.write_all(&buffer.buf[..n])?;
        total = total.saturating_add(n as u64);
    }
}

/// Copies an archive entry stream into `writer`.
///
/// `on_chunk(chunk, total)` runs after each read and before the chunk is
/// written, so a limit check can stop the copy before the bytes reach disk.
///
/// Read failures come from the decoder and are reported as
/// `ArchiveCorrupt`; write failures are `Io`.
pub(crate) fn copy_entry<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    mut on_chunk: F,
) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64, u64) -> Result<()>,
{
    let mut total: u64 = 0;
    loop {
        let n = fill(reader, &mut buffer.buf)
            .map_err(|e| StageError::ArchiveCorrupt(format!("failed to read entry data: {e}")))?;
        if n == 0 {
            return Ok(total);
        }
        total = total.saturating_add(n as u64);
        on_chunk(n as u64, total)?;
        writer.write_all(&buffer.buf[..n])?;
    }
}

/// One `read` call, retried on `Interrupted`.
fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}
