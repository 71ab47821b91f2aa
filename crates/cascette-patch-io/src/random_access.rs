//! Typed random access over a seekable medium
//!
//! [`RandomAccessObject`] is the capability set the diff and patch engines
//! use when they need arbitrary seeks, for example when consulting an offset
//! table of 4-byte entries produced by suffix sorting. Implementors supply the
//! cursor primitives and the scratch-routed scalar transfer; every typed
//! accessor is derived from those.
//!
//! All scalars are big-endian. Text-oriented operations exist only to fail
//! with [`PatchIoError::UnsupportedOperation`].

use crate::codec::{SCALAR_WIDTH, decode, encode};
use crate::error::{PatchIoError, Result};

/// Width in bytes of one entry in an int-aligned table
pub const INT_ALIGNMENT: u64 = 4;

/// Typed scalar and block access at arbitrary byte offsets over one open handle.
///
/// An instance owns exactly one cursor. Reads and writes start at the cursor
/// and advance it by the number of bytes transferred.
///
/// Reads either fill the requested amount or fail with
/// [`PatchIoError::EndOfMedium`]; they never return a truncated value. Writes
/// reach the medium before the call returns.
///
/// The trait is object safe so engines can work against
/// `&mut dyn RandomAccessObject`.
pub trait RandomAccessObject {
    /// Current length of the medium in bytes
    fn length(&mut self) -> Result<u64>;

    /// Current absolute cursor position
    fn position(&mut self) -> Result<u64>;

    /// Move the cursor to absolute byte offset `pos`.
    ///
    /// Seeking past the end is allowed; reads from there fail with
    /// `EndOfMedium` and writes extend the medium.
    fn seek(&mut self, pos: u64) -> Result<()>;

    /// Fill `buf` completely from the cursor
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Write all of `buf` at the cursor
    fn write_fully(&mut self, buf: &[u8]) -> Result<()>;

    /// Read `width` bytes (at most [`SCALAR_WIDTH`]) through the scratch buffer.
    ///
    /// The returned array is a copy; only its first `width` bytes are set.
    fn read_scalar_bytes(&mut self, width: usize) -> Result<[u8; SCALAR_WIDTH]>;

    /// Write the first `width` bytes of `bytes` through the scratch buffer
    fn write_scalar_bytes(&mut self, bytes: [u8; SCALAR_WIDTH], width: usize) -> Result<()>;

    /// Release the handle. Every later operation fails with `IllegalState`.
    fn close(&mut self) -> Result<()>;

    /// Seek to entry `index` of a table of 4-byte entries, i.e. byte `index * 4`
    fn seek_to_int_aligned(&mut self, index: u64) -> Result<()> {
        let pos = index.checked_mul(INT_ALIGNMENT).ok_or_else(|| {
            PatchIoError::illegal_range(format!("int-aligned index {index} overflows"))
        })?;
        self.seek(pos)
    }

    /// Advance the cursor by up to `n` bytes, returning the amount skipped.
    ///
    /// The amount is clamped to `length - position - 1`, one short of the
    /// bytes actually remaining. At the final byte this skips nothing.
    fn skip_bytes(&mut self, n: u64) -> Result<u64> {
        let length = self.length()?;
        let position = self.position()?;
        let skip = n.min(length.saturating_sub(position).saturating_sub(1));
        if skip > 0 {
            self.seek(position + skip)?;
        }
        Ok(skip)
    }

    /// Fill `buf[offset..offset + len]` from the cursor
    fn read_block(&mut self, buf: &mut [u8], offset: usize, len: usize) -> Result<()> {
        let end = block_end(buf.len(), offset, len)?;
        self.read_fully(&mut buf[offset..end])
    }

    /// Write `buf[offset..offset + len]` at the cursor
    fn write_block(&mut self, buf: &[u8], offset: usize, len: usize) -> Result<()> {
        let end = block_end(buf.len(), offset, len)?;
        self.write_fully(&buf[offset..end])
    }

    /// Read one byte; any non-zero value is `true`
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a signed byte
    fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_be_bytes(decode(self.read_scalar_bytes(1)?)))
    }

    /// Read an unsigned byte
    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_scalar_bytes(1)?[0])
    }

    /// Read a signed 16-bit value
    fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(decode(self.read_scalar_bytes(2)?)))
    }

    /// Read an unsigned 16-bit value
    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(decode(self.read_scalar_bytes(2)?)))
    }

    /// Read one UTF-16 code unit
    fn read_char(&mut self) -> Result<u16> {
        self.read_u16()
    }

    /// Read a signed 32-bit value
    fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(decode(self.read_scalar_bytes(4)?)))
    }

    /// Read a signed 64-bit value
    fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(decode(self.read_scalar_bytes(8)?)))
    }

    /// Read an IEEE 754 single
    fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(decode(self.read_scalar_bytes(4)?)))
    }

    /// Read an IEEE 754 double
    fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(decode(self.read_scalar_bytes(8)?)))
    }

    /// Write `1` for `true`, `0` for `false`
    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Write a signed byte
    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_scalar_bytes(encode(value.to_be_bytes()), 1)
    }

    /// Write an unsigned byte
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_scalar_bytes(encode([value]), 1)
    }

    /// Write a single raw byte; same as [`write_u8`](Self::write_u8)
    fn write_byte(&mut self, value: u8) -> Result<()> {
        self.write_u8(value)
    }

    /// Write a signed 16-bit value
    fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_scalar_bytes(encode(value.to_be_bytes()), 2)
    }

    /// Write an unsigned 16-bit value
    fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_scalar_bytes(encode(value.to_be_bytes()), 2)
    }

    /// Write one UTF-16 code unit
    fn write_char(&mut self, value: u16) -> Result<()> {
        self.write_u16(value)
    }

    /// Write a signed 32-bit value
    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_scalar_bytes(encode(value.to_be_bytes()), 4)
    }

    /// Write a signed 64-bit value
    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_scalar_bytes(encode(value.to_be_bytes()), 8)
    }

    /// Write an IEEE 754 single
    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_scalar_bytes(encode(value.to_be_bytes()), 4)
    }

    /// Write an IEEE 754 double
    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_scalar_bytes(encode(value.to_be_bytes()), 8)
    }

    /// Line-oriented text reads are not supported on binary objects
    fn read_line(&mut self) -> Result<String> {
        Err(PatchIoError::UnsupportedOperation("read_line"))
    }

    /// Modified-UTF-8 reads are not supported on binary objects
    fn read_utf(&mut self) -> Result<String> {
        Err(PatchIoError::UnsupportedOperation("read_utf"))
    }

    /// Writing a string as raw bytes is not supported on binary objects
    fn write_str_bytes(&mut self, _value: &str) -> Result<()> {
        Err(PatchIoError::UnsupportedOperation("write_str_bytes"))
    }

    /// Writing a string as UTF-16 code units is not supported on binary objects
    fn write_chars(&mut self, _value: &str) -> Result<()> {
        Err(PatchIoError::UnsupportedOperation("write_chars"))
    }

    /// Modified-UTF-8 writes are not supported on binary objects
    fn write_utf(&mut self, _value: &str) -> Result<()> {
        Err(PatchIoError::UnsupportedOperation("write_utf"))
    }
}

fn block_end(buf_len: usize, offset: usize, len: usize) -> Result<usize> {
    match offset.checked_add(len) {
        Some(end) if end <= buf_len => Ok(end),
        _ => Err(PatchIoError::illegal_range(format!(
            "block {offset}+{len} exceeds buffer of {buf_len} bytes"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_block_end_bounds() {
        assert_eq!(block_end(10, 2, 8).unwrap(), 10);
        assert_eq!(block_end(10, 0, 0).unwrap(), 0);
        assert!(block_end(10, 3, 8).is_err());
        assert!(block_end(10, usize::MAX, 2).is_err());
    }
}
