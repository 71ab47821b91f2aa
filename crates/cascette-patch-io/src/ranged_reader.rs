//! Read-only stream bounded to a sub-range of a file
//!
//! The file is assumed not to change while open, which makes mark/reset a
//! plain seek: there is no buffer and therefore no read limit. A mark stays
//! valid for any number of resets until the range is changed.
//!
//! One open handle can serve several logical regions of the same file (for
//! example successive archive entries) through [`RangedFileReader::set_range`].

use crate::codec::read_fully;
use crate::error::{PatchIoError, Result};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, trace};

/// Sequential reader over `[range_offset, range_offset + range_length)` of a file
#[derive(Debug)]
pub struct RangedFileReader {
    /// `None` once closed
    file: Option<File>,
    /// File length at the moment it was opened
    file_length: u64,
    range_offset: u64,
    range_length: u64,
    /// Absolute cursor, mirrors the file position
    position: u64,
    mark: Option<u64>,
}

impl RangedFileReader {
    /// Open `path` read-only with the range covering the whole file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let length = file.metadata()?.len();
        Self::from_file(file, 0, length)
    }

    /// Open `path` read-only, restricted to `length` bytes starting at `offset`
    pub fn open_range(path: impl AsRef<Path>, offset: u64, length: u64) -> Result<Self> {
        let path = path.as_ref();
        debug!(
            "Opening {} for ranged reads at {}+{}",
            path.display(),
            offset,
            length
        );
        Self::from_file(File::open(path)?, offset, length)
    }

    /// Wrap an open file, restricted to `length` bytes starting at `offset`
    pub fn from_file(file: File, offset: u64, length: u64) -> Result<Self> {
        let file_length = file.metadata()?.len();
        let mut reader = Self {
            file: Some(file),
            file_length,
            range_offset: 0,
            range_length: 0,
            position: 0,
            mark: None,
        };
        reader.set_range(offset, length)?;
        Ok(reader)
    }

    /// Re-scope the reader to a new range, seek to its start and drop any mark.
    ///
    /// Fails with `IllegalRange` if `offset + length` overflows or exceeds the
    /// file length; the reader is left unchanged in that case.
    pub fn set_range(&mut self, offset: u64, length: u64) -> Result<()> {
        let end = offset
            .checked_add(length)
            .ok_or_else(|| PatchIoError::illegal_range("range end overflows u64"))?;
        if end > self.file_length {
            return Err(PatchIoError::illegal_range(format!(
                "Read range {offset}+{length} exceeds file length {}",
                self.file_length
            )));
        }

        self.seek_to(offset)?;
        self.range_offset = offset;
        self.range_length = length;
        self.mark = None;
        trace!("Range set to {}+{}", offset, length);
        Ok(())
    }

    /// Bytes left in the range, saturating at `usize::MAX`
    pub fn available(&self) -> Result<usize> {
        Ok(usize::try_from(self.remaining()?).unwrap_or(usize::MAX))
    }

    /// Read one byte, or `None` once the range is exhausted
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.remaining()? == 0 {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        read_fully(self.file_mut()?, &mut byte)?;
        self.position += 1;
        Ok(Some(byte[0]))
    }

    /// Skip up to `n` bytes within the range, returning the amount skipped
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        let amount = n.min(self.remaining()?);
        if amount > 0 {
            self.seek_to(self.position + amount)?;
        }
        Ok(amount)
    }

    /// Remember the current position.
    ///
    /// There is no read limit: the mark survives any amount of reading.
    pub fn mark(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.mark = Some(self.position);
        Ok(())
    }

    /// Return to the marked position; the mark stays set.
    ///
    /// Fails with `IllegalState` if [`mark`](Self::mark) was never called
    /// since the range was last set.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_open()?;
        let mark = self
            .mark
            .ok_or(PatchIoError::IllegalState("mark not set"))?;
        self.seek_to(mark)
    }

    /// Absolute position in the file
    pub fn position(&self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.position)
    }

    /// Length of the file when it was opened
    pub const fn length(&self) -> u64 {
        self.file_length
    }

    /// Start of the current range
    pub const fn range_offset(&self) -> u64 {
        self.range_offset
    }

    /// Number of bytes in the current range
    pub const fn range_length(&self) -> u64 {
        self.range_length
    }

    /// Release the file. Every later operation fails with `IllegalState`.
    pub fn close(&mut self) -> Result<()> {
        let file = self.file.take().ok_or_else(PatchIoError::closed)?;
        trace!("Closing ranged reader at {}", self.position);
        drop(file);
        Ok(())
    }

    fn remaining(&self) -> Result<u64> {
        self.ensure_open()?;
        let consumed = self.position.saturating_sub(self.range_offset);
        Ok(self.range_length.saturating_sub(consumed))
    }

    fn seek_to(&mut self, pos: u64) -> Result<()> {
        self.position = self.file_mut()?.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.file.is_none() {
            return Err(PatchIoError::closed());
        }
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or_else(PatchIoError::closed)
    }
}

impl Read for RangedFileReader {
    /// Reads at most `min(buf.len(), available)` bytes in a single pull.
    /// Returns `Ok(0)` at the end of the range.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let remaining = self.remaining()?;
        if remaining == 0 {
            return Ok(0);
        }

        let len = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = self.file_mut()?.read(&mut buf[..len])?;
        self.position += n as u64;
        Ok(n)
    }
}
