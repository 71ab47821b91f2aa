//! Random-access objects over files and in-memory buffers
//!
//! [`RandomAccessMedium`] adapts any [`Medium`] (a `Read + Write + Seek`
//! handle that can report its size) to [`RandomAccessObject`]. The two
//! concrete forms are [`FileRandomAccess`] for on-disk data and
//! [`MemoryRandomAccess`] for buffers small enough to keep in memory.

use crate::codec::{SCALAR_WIDTH, ScratchBuffer, read_fully};
use crate::error::{PatchIoError, Result};
use crate::random_access::RandomAccessObject;
use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, trace};

/// A seekable byte store that can report its length and force data to storage
pub trait Medium: Read + Write + Seek {
    /// Current size in bytes
    fn size(&self) -> io::Result<u64>;

    /// Force written data to stable storage
    fn sync(&mut self) -> io::Result<()>;
}

impl Medium for File {
    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

impl Medium for Cursor<Vec<u8>> {
    fn size(&self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// [`RandomAccessObject`] over one exclusively owned [`Medium`]
///
/// The medium's own cursor is the object's cursor. Scalar transfers go
/// through a scratch buffer owned by this instance.
#[derive(Debug)]
pub struct RandomAccessMedium<M: Medium> {
    /// `None` once closed
    medium: Option<M>,
    scratch: ScratchBuffer,
}

/// Random access over an open file
pub type FileRandomAccess = RandomAccessMedium<File>;

/// Random access over an in-memory buffer
pub type MemoryRandomAccess = RandomAccessMedium<Cursor<Vec<u8>>>;

impl<M: Medium> RandomAccessMedium<M> {
    /// Wrap an already-open medium; the cursor stays where the medium has it
    pub const fn new(medium: M) -> Self {
        Self {
            medium: Some(medium),
            scratch: ScratchBuffer::new(),
        }
    }

    /// Force written data to stable storage
    pub fn sync(&mut self) -> Result<()> {
        self.medium_mut()?.sync()?;
        Ok(())
    }

    /// Whether [`close`](RandomAccessObject::close) has been called
    pub const fn is_closed(&self) -> bool {
        self.medium.is_none()
    }

    fn medium_mut(&mut self) -> Result<&mut M> {
        self.medium.as_mut().ok_or_else(PatchIoError::closed)
    }
}

impl FileRandomAccess {
    /// Open an existing file read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening {} for random read access", path.display());
        Ok(Self::new(File::open(path)?))
    }

    /// Open an existing file for reading and writing
    pub fn open_rw(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening {} for random read/write access", path.display());
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self::new(file))
    }

    /// Create a file for reading and writing, truncating any existing content
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Creating {} for random read/write access", path.display());
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::new(file))
    }

    /// Wrap an open file handle
    pub const fn from_file(file: File) -> Self {
        Self::new(file)
    }
}

impl MemoryRandomAccess {
    /// Random access over `data`, cursor at 0
    pub const fn from_vec(data: Vec<u8>) -> Self {
        Self::new(Cursor::new(data))
    }

    /// Zero-filled buffer of `len` bytes, cursor at 0
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![0; len])
    }

    /// Take back the underlying bytes
    pub fn into_inner(self) -> Result<Vec<u8>> {
        self.medium
            .map(Cursor::into_inner)
            .ok_or_else(PatchIoError::closed)
    }
}

impl<M: Medium> RandomAccessObject for RandomAccessMedium<M> {
    fn length(&mut self) -> Result<u64> {
        Ok(self.medium_mut()?.size()?)
    }

    fn position(&mut self) -> Result<u64> {
        Ok(self.medium_mut()?.stream_position()?)
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        self.medium_mut()?.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        read_fully(self.medium_mut()?, buf)
    }

    fn write_fully(&mut self, buf: &[u8]) -> Result<()> {
        self.medium_mut()?.write_all(buf)?;
        Ok(())
    }

    fn read_scalar_bytes(&mut self, width: usize) -> Result<[u8; SCALAR_WIDTH]> {
        let medium = self.medium.as_mut().ok_or_else(PatchIoError::closed)?;
        self.scratch.read_word(medium, width)
    }

    fn write_scalar_bytes(&mut self, bytes: [u8; SCALAR_WIDTH], width: usize) -> Result<()> {
        let medium = self.medium.as_mut().ok_or_else(PatchIoError::closed)?;
        self.scratch.write_word(medium, bytes, width)
    }

    fn close(&mut self) -> Result<()> {
        let medium = self.medium.take().ok_or_else(PatchIoError::closed)?;
        trace!("Closing random-access medium");
        drop(medium);
        Ok(())
    }
}
