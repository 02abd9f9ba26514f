//! Read and write cursors over a [`ByteBuffer`](super::ByteBuffer).
//!
//! Cursors own the position; the buffer only owns the bytes. `seek` and
//! `skip` never clamp, so a cursor may sit past the end, and the next
//! access then fails with [`BufferError::OutOfBounds`](super::BufferError::OutOfBounds).

use super::error::BufferResult;
use super::{checked_range, Endianness};

/// Read cursor borrowed from a buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    endianness: Endianness,
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(super) fn new(data: &'a [u8], endianness: Endianness) -> Self {
        Self {
            data,
            endianness,
            offset: 0,
        }
    }

    /// Move the cursor to an absolute offset.
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Move the cursor forward by `n` bytes.
    pub fn skip(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// True once the cursor has reached or passed the end of the buffer.
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn take(&mut self, len: usize) -> BufferResult<&'a [u8]> {
        let data = self.data;
        let range = checked_range(self.offset, len, data.len())?;
        self.offset = range.end;
        Ok(&data[range])
    }

    fn read_uint(&mut self, width: usize) -> BufferResult<u32> {
        let bytes = self.take(width)?;
        let value = match self.endianness {
            Endianness::Big => bytes.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32),
            Endianness::Little => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | b as u32),
        };
        Ok(value)
    }

    pub fn read_u8(&mut self) -> BufferResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> BufferResult<u16> {
        self.read_uint(2).map(|v| v as u16)
    }

    /// Read a 24-bit unsigned integer.
    pub fn read_u24(&mut self) -> BufferResult<u32> {
        self.read_uint(3)
    }

    pub fn read_u32(&mut self) -> BufferResult<u32> {
        self.read_uint(4)
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> BufferResult<Vec<u8>> {
        self.take(len).map(<[u8]>::to_vec)
    }

    /// Read a zero-terminated string stored in a fixed-width field.
    ///
    /// Decoding stops at the first zero byte or the end of the buffer, one
    /// character per byte. The cursor always advances by exactly `len`.
    pub fn read_fixed_string(&mut self, len: usize) -> String {
        let start = self.offset.min(self.data.len());
        let end = self.offset.saturating_add(len).min(self.data.len());

        let text = self.data[start..end]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();

        self.skip(len);
        text
    }
}

/// Write cursor borrowed from a buffer.
///
/// Writes never grow the buffer; allocate the target at its final size.
#[derive(Debug)]
pub struct ByteWriter<'a> {
    data: &'a mut [u8],
    endianness: Endianness,
    offset: usize,
}

impl<'a> ByteWriter<'a> {
    pub(super) fn new(data: &'a mut [u8], endianness: Endianness) -> Self {
        Self {
            data,
            endianness,
            offset: 0,
        }
    }

    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn skip(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn slot(&mut self, len: usize) -> BufferResult<&mut [u8]> {
        let range = checked_range(self.offset, len, self.data.len())?;
        self.offset = range.end;
        Ok(&mut self.data[range])
    }

    fn write_uint(&mut self, value: u32, width: usize) -> BufferResult<()> {
        let endianness = self.endianness;
        let slot = self.slot(width)?;
        for (i, byte) in slot.iter_mut().enumerate() {
            let shift = match endianness {
                Endianness::Big => 8 * (width - 1 - i),
                Endianness::Little => 8 * i,
            };
            *byte = (value >> shift) as u8;
        }
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> BufferResult<()> {
        self.slot(1)?[0] = value;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> BufferResult<()> {
        self.write_uint(value as u32, 2)
    }

    /// Write the low 24 bits of `value`.
    pub fn write_u24(&mut self, value: u32) -> BufferResult<()> {
        self.write_uint(value & 0x00FF_FFFF, 3)
    }

    pub fn write_u32(&mut self, value: u32) -> BufferResult<()> {
        self.write_uint(value, 4)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> BufferResult<()> {
        self.slot(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Write `value` repeated `count` times.
    pub fn fill(&mut self, value: u8, count: usize) -> BufferResult<()> {
        self.slot(count)?.fill(value);
        Ok(())
    }

    /// Write `text` into a fixed-width field, zero padding up to `len`.
    ///
    /// `len` defaults to the character count of `text`; characters beyond
    /// `len` are dropped. Each character is stored as the low byte of its
    /// code point. The cursor advances by exactly `len`.
    pub fn write_fixed_string(&mut self, text: &str, len: Option<usize>) -> BufferResult<()> {
        let len = len.unwrap_or_else(|| text.chars().count());
        let slot = self.slot(len)?;
        slot.fill(0);
        for (byte, ch) in slot.iter_mut().zip(text.chars()) {
            *byte = ch as u32 as u8;
        }
        Ok(())
    }
}
