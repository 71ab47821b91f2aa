//! Sequential output over a file sized to its final length up front
//!
//! Patch application knows the size of the output before producing it. The
//! writer fills the target with zeros to that size at construction, so the
//! file exists at full length before any real byte arrives, then rewinds and
//! lets the caller write sequentially from offset 0.

use crate::config::{IoConfig, SyncMode};
use crate::error::{PatchIoError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Append `size` zero bytes at the cursor in chunks of `chunk_size`
pub(crate) fn write_zeros<W: Write + ?Sized>(
    writer: &mut W,
    size: u64,
    chunk_size: usize,
) -> io::Result<()> {
    let zeros = vec![0u8; chunk_size.min(usize::try_from(size).unwrap_or(usize::MAX))];
    let mut remaining = size;
    while remaining > 0 {
        let n = usize::try_from(remaining).map_or(zeros.len(), |r| r.min(zeros.len()));
        writer.write_all(&zeros[..n])?;
        remaining -= n as u64;
    }
    Ok(())
}

/// Write-only stream over a pre-sized file
///
/// Writes go straight to the file; `flush` forces them to stable storage.
#[derive(Debug)]
pub struct PreallocatedFileWriter {
    /// `None` once closed
    file: Option<File>,
    expected_size: u64,
    position: u64,
    sync_mode: SyncMode,
}

impl PreallocatedFileWriter {
    /// Create or truncate `path` and size it to `expected_size` zero bytes
    pub fn create(path: impl AsRef<Path>, expected_size: u64) -> Result<Self> {
        Self::with_config(path, expected_size, &IoConfig::default())
    }

    /// Like [`create`](Self::create) with explicit fill and sync settings
    pub fn with_config(
        path: impl AsRef<Path>,
        expected_size: u64,
        config: &IoConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        debug!(
            "Pre-allocating {} bytes for {}",
            expected_size,
            path.display()
        );

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        write_zeros(&mut file, expected_size, config.chunk_size())?;
        file.seek(SeekFrom::Start(0))?;

        Ok(Self {
            file: Some(file),
            expected_size,
            position: 0,
            sync_mode: config.sync_mode,
        })
    }

    /// Size the file was pre-allocated to
    pub const fn expected_size(&self) -> u64 {
        self.expected_size
    }

    /// Bytes written since construction
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Write a single byte
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.file_mut()?.write_all(&[value])?;
        self.position += 1;
        Ok(())
    }

    /// Flush to stable storage, then release the file.
    ///
    /// Every later operation fails with `IllegalState`.
    pub fn close(&mut self) -> Result<()> {
        let file = self.file.take().ok_or_else(PatchIoError::closed)?;
        self.sync_mode.sync(&file)?;
        trace!(
            "Closed pre-allocated writer after {} of {} bytes",
            self.position, self.expected_size
        );
        drop(file);
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or_else(PatchIoError::closed)
    }
}

impl Write for PreallocatedFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file_mut()?.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    /// Forces written data to stable storage
    fn flush(&mut self) -> io::Result<()> {
        let mode = self.sync_mode;
        mode.sync(self.file_mut()?)
    }
}
