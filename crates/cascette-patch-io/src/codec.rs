//! Scratch-buffer scalar codec and the read-until-filled loop
//!
//! Scalars are staged through a small buffer owned by each random-access
//! object. Callers only ever receive copies of the staged bytes, never a
//! reference into the buffer itself.

use crate::error::{PatchIoError, Result};
use std::io::{ErrorKind, Read, Write};

/// Width of the widest scalar (`i64`/`f64`)
pub const SCALAR_WIDTH: usize = 8;

/// Bytes of one scalar, left-aligned; only the first `width` bytes are meaningful
pub(crate) type Word = [u8; SCALAR_WIDTH];

/// Fill `buf` completely from `reader`.
///
/// Short reads are retried until the buffer is full. A read returning zero
/// bytes means the medium is exhausted and fails with
/// [`PatchIoError::EndOfMedium`]; `Interrupted` is retried.
pub(crate) fn read_fully<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(PatchIoError::end_of_medium(buf.len(), filled)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Fixed-size staging area for scalar transfers.
///
/// Not reentrant: one scalar is in flight at a time, which `&mut self`
/// guarantees.
#[derive(Debug, Default)]
pub(crate) struct ScratchBuffer {
    buf: Word,
}

impl ScratchBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            buf: [0; SCALAR_WIDTH],
        }
    }

    /// Read `width` bytes into the scratch area and return a copy of them
    pub(crate) fn read_word<R: Read + ?Sized>(&mut self, reader: &mut R, width: usize) -> Result<Word> {
        let width = width.min(SCALAR_WIDTH);
        read_fully(reader, &mut self.buf[..width])?;

        let mut word = [0; SCALAR_WIDTH];
        word[..width].copy_from_slice(&self.buf[..width]);
        Ok(word)
    }

    /// Stage the first `width` bytes of `word` and push them to `writer`
    pub(crate) fn write_word<W: Write + ?Sized>(
        &mut self,
        writer: &mut W,
        word: Word,
        width: usize,
    ) -> Result<()> {
        let width = width.min(SCALAR_WIDTH);
        self.buf[..width].copy_from_slice(&word[..width]);
        writer.write_all(&self.buf[..width])?;
        Ok(())
    }
}

/// Left-align the big-endian bytes of a scalar into a [`Word`]
pub(crate) fn encode<const N: usize>(bytes: [u8; N]) -> Word {
    let mut word = [0; SCALAR_WIDTH];
    word[..N].copy_from_slice(&bytes);
    word
}

/// Take the first `N` bytes of a [`Word`]
pub(crate) fn decode<const N: usize>(word: Word) -> [u8; N] {
    let mut bytes = [0; N];
    bytes.copy_from_slice(&word[..N]);
    bytes
}
