//! Random-access binary I/O for patch generation and application
//!
#![allow(clippy::cast_possible_truncation)] // Lengths are clamped before narrowing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::float_cmp)] // Exact round-trip checks on scalars
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! This crate is the I/O layer underneath the diff and patch engines. It reads
//! and writes files far larger than memory without interpreting their format.
//!
//! # Components
//!
//! - **[`RandomAccessObject`]**: typed scalar and block access at arbitrary
//!   offsets, including int-aligned seeks into tables of 4-byte entries
//! - **[`FileRandomAccess`] / [`MemoryRandomAccess`]**: implementations over a
//!   file handle or an in-memory buffer
//! - **[`RangedFileReader`]**: read-only stream over a sub-range of a file with
//!   unlimited mark/reset
//! - **[`PreallocatedFileWriter`]**: write-only stream over a file sized to its
//!   final length before the first write
//! - **[`RandomAccessFactory`]**: scratch objects of a requested size on disk or
//!   in memory
//!
//! # Contract
//!
//! - One cursor per instance, moved by every read, write and seek
//! - Reads fill the whole request or fail with [`PatchIoError::EndOfMedium`]
//! - Scalars are big-endian and pass through a scratch buffer owned by the instance
//! - Writes reach the handle before the call returns
//! - After `close`, every operation fails with [`PatchIoError::IllegalState`]
//!
//! Instances are not synchronised; every operation takes `&mut self`.
//!
//! # Example
//!
//! ```rust
//! use cascette_patch_io::{MemoryRandomAccess, RandomAccessObject};
//!
//! # fn example() -> cascette_patch_io::Result<()> {
//! let mut table = MemoryRandomAccess::zeroed(16);
//! table.seek_to_int_aligned(2)?;
//! table.write_i32(42)?;
//!
//! table.seek(8)?;
//! assert_eq!(table.read_i32()?, 42);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

mod codec;
/// Configuration for pre-sized output
pub mod config;
mod error;
/// Scratch random-access objects on disk or in memory
pub mod factory;
mod medium;
mod preallocated_writer;
mod random_access;
mod ranged_reader;

pub use codec::SCALAR_WIDTH;
pub use config::{IoConfig, SyncMode};
pub use error::{PatchIoError, Result};
pub use factory::{MemoryFactory, RandomAccessFactory, TempFileFactory};
pub use medium::{FileRandomAccess, Medium, MemoryRandomAccess, RandomAccessMedium};
pub use preallocated_writer::PreallocatedFileWriter;
pub use random_access::{INT_ALIGNMENT, RandomAccessObject};
pub use ranged_reader::RangedFileReader;
