//! Configuration for pre-sized output files

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;

/// Smallest zero-fill chunk accepted
pub const MIN_FILL_CHUNK_SIZE: usize = 1024;

/// Default zero-fill chunk
pub const DEFAULT_FILL_CHUNK_SIZE: usize = 4 * 1024;

/// What a flush forces to stable storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// File data and metadata (`fsync`)
    #[default]
    All,
    /// File data only (`fdatasync`)
    Data,
}

impl SyncMode {
    /// Force `file` to storage according to this mode
    pub fn sync(self, file: &File) -> io::Result<()> {
        match self {
            Self::All => file.sync_all(),
            Self::Data => file.sync_data(),
        }
    }
}

/// Tunables for pre-allocating writers and temporary random-access files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Bytes of zeros written per call while pre-sizing a file
    pub fill_chunk_size: usize,

    /// What `flush` forces to storage
    pub sync_mode: SyncMode,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            fill_chunk_size: DEFAULT_FILL_CHUNK_SIZE,
            sync_mode: SyncMode::All,
        }
    }
}

impl IoConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zero-fill chunk size (at least [`MIN_FILL_CHUNK_SIZE`])
    #[must_use]
    pub fn with_fill_chunk_size(mut self, size: usize) -> Self {
        self.fill_chunk_size = size.max(MIN_FILL_CHUNK_SIZE);
        self
    }

    /// Set what `flush` forces to storage
    #[must_use]
    pub const fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    /// Zero-fill chunk size in effect, clamped to [`MIN_FILL_CHUNK_SIZE`]
    ///
    /// Deserialized configs bypass the builder, so the clamp is applied here too.
    pub fn chunk_size(&self) -> usize {
        self.fill_chunk_size.max(MIN_FILL_CHUNK_SIZE)
    }
}
