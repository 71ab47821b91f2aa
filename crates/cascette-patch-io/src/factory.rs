//! Factories for scratch random-access objects
//!
//! Diff generation needs temporary tables (suffix arrays, group arrays) whose
//! size is known before they are filled. A [`RandomAccessFactory`] hands out a
//! zero-filled object of that size so the algorithm can stay agnostic about
//! whether the table lives on disk or in memory.

use crate::config::IoConfig;
use crate::error::{PatchIoError, Result};
use crate::medium::{FileRandomAccess, MemoryRandomAccess};
use crate::preallocated_writer::write_zeros;
use crate::random_access::RandomAccessObject;
use std::io::{Seek, SeekFrom};
use tracing::debug;

/// Creates zero-filled random-access objects with the cursor at 0
pub trait RandomAccessFactory {
    /// Create an object holding `size` zero bytes
    fn create(&self, size: u64) -> Result<Box<dyn RandomAccessObject>>;
}

/// Backs each object with an anonymous temporary file.
///
/// The file has no name on disk and is removed by the OS once the object is
/// closed or dropped.
#[derive(Debug, Clone, Default)]
pub struct TempFileFactory {
    config: IoConfig,
}

impl TempFileFactory {
    /// Factory with default fill settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory using `config` for the zero fill
    pub const fn with_config(config: IoConfig) -> Self {
        Self { config }
    }
}

impl RandomAccessFactory for TempFileFactory {
    fn create(&self, size: u64) -> Result<Box<dyn RandomAccessObject>> {
        debug!("Creating temporary file-backed object of {} bytes", size);
        let mut file = tempfile::tempfile()?;
        write_zeros(&mut file, size, self.config.chunk_size())?;
        file.seek(SeekFrom::Start(0))?;
        Ok(Box::new(FileRandomAccess::from_file(file)))
    }
}

/// Backs each object with a heap buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryFactory;

impl RandomAccessFactory for MemoryFactory {
    fn create(&self, size: u64) -> Result<Box<dyn RandomAccessObject>> {
        let len = usize::try_from(size).map_err(|_| {
            PatchIoError::illegal_range(format!("{size} bytes do not fit in memory"))
        })?;
        Ok(Box::new(MemoryRandomAccess::zeroed(len)))
    }
}
