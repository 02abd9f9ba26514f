//! Growable binary regions with endianness-aware cursor access.
//!
//! A [`ByteBuffer`] owns its bytes and an endianness flag. It carries no
//! cursor of its own: reading and writing go through short-lived
//! [`ByteReader`] and [`ByteWriter`] values, so two logical readers of the
//! same buffer never share a position.
//!
//! ```text
//! ByteBuffer ──► reader() ──► ByteReader  (seek, skip, read_u8..read_u32, ...)
//!            └─► writer() ──► ByteWriter  (seek, skip, write_u8..write_u32, ...)
//! ```
//!
//! Every access is bounds checked and reports [`BufferError::OutOfBounds`]
//! instead of wrapping or panicking.
//!
//! # Example
//!
//! ```
//! use rompatch::buffer::ByteBuffer;
//!
//! let mut buffer = ByteBuffer::alloc(4);
//! buffer.writer().write_u24(0x454F46).unwrap();
//! assert_eq!(buffer.as_bytes(), b"EOF\0");
//! assert_eq!(buffer.reader().read_u16().unwrap(), 0x454F);
//! ```

mod cursor;
mod error;

pub use cursor::{ByteReader, ByteWriter};
pub use error::{BufferError, BufferResult};

/// Byte order used by multi-byte cursor primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Most significant byte first (the IPS wire order).
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

/// An owned binary region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteBuffer {
    data: Vec<u8>,
    endianness: Endianness,
}

impl ByteBuffer {
    /// Allocate a zero-filled buffer of `size` bytes.
    pub fn alloc(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
            endianness: Endianness::default(),
        }
    }

    /// Adopt an existing byte vector.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: bytes.into(),
            endianness: Endianness::default(),
        }
    }

    /// Set the byte order used by cursors created from this buffer.
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Change the byte order in place.
    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Size of the region in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Copy `len` bytes starting at `offset` into a new, independent buffer.
    ///
    /// When `len` is `None` the slice runs to the end of the buffer. The new
    /// buffer inherits this buffer's endianness.
    pub fn slice(&self, offset: usize, len: Option<usize>) -> BufferResult<ByteBuffer> {
        let size = self.len();
        let len = match len {
            Some(len) => len,
            None => size
                .checked_sub(offset)
                .ok_or_else(|| BufferError::out_of_bounds(offset, 0, size))?,
        };
        let range = checked_range(offset, len, size)?;

        Ok(ByteBuffer {
            data: self.data[range].to_vec(),
            endianness: self.endianness,
        })
    }

    /// Copy raw bytes from this buffer into `target`.
    ///
    /// `len` defaults to the rest of this buffer from `src_offset`, and
    /// `dst_offset` defaults to `src_offset`. The target never grows: the
    /// caller must allocate it large enough.
    pub fn copy_into(
        &self,
        target: &mut ByteBuffer,
        src_offset: usize,
        len: Option<usize>,
        dst_offset: Option<usize>,
    ) -> BufferResult<()> {
        let size = self.len();
        let len = match len {
            Some(len) => len,
            None => size
                .checked_sub(src_offset)
                .ok_or_else(|| BufferError::out_of_bounds(src_offset, 0, size))?,
        };
        let dst_offset = dst_offset.unwrap_or(src_offset);

        let src = checked_range(src_offset, len, size)?;
        let dst = checked_range(dst_offset, len, target.len())?;
        target.data[dst].copy_from_slice(&self.data[src]);
        Ok(())
    }

    /// Create a read cursor positioned at offset 0.
    pub fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(&self.data, self.endianness)
    }

    /// Create a read cursor that ignores the buffer's endianness flag.
    pub fn reader_with(&self, endianness: Endianness) -> ByteReader<'_> {
        ByteReader::new(&self.data, endianness)
    }

    /// Create a write cursor positioned at offset 0.
    pub fn writer(&mut self) -> ByteWriter<'_> {
        let endianness = self.endianness;
        ByteWriter::new(&mut self.data, endianness)
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Validate `offset..offset + len` against `size`.
pub(crate) fn checked_range(
    offset: usize,
    len: usize,
    size: usize,
) -> BufferResult<std::ops::Range<usize>> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(offset..end),
        _ => Err(BufferError::out_of_bounds(offset, len, size)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_is_zero_filled() {
        let buffer = ByteBuffer::alloc(8);
        assert_eq!(buffer.len(), 8);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buffer.endianness(), Endianness::Big);
    }

    #[test]
    fn test_from_bytes_adopts_content() {
        let buffer = ByteBuffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(buffer.as_bytes(), &[1, 2, 3]);
        assert_eq!(buffer.into_bytes(), vec![1, 2, 3]);
    }

    #[test]
    fn test_slice_defaults_to_remainder() {
        let buffer = ByteBuffer::from_bytes(vec![1, 2, 3, 4, 5]);
        let tail = buffer.slice(2, None).unwrap();
        assert_eq!(tail.as_bytes(), &[3, 4, 5]);

        let middle = buffer.slice(1, Some(2)).unwrap();
        assert_eq!(middle.as_bytes(), &[2, 3]);
    }

    #[test]
    fn test_slice_is_independent_copy() {
        let buffer = ByteBuffer::from_bytes(vec![1, 2, 3]);
        let mut copy = buffer.slice(0, None).unwrap();
        copy.writer().write_u8(0xFF).unwrap();

        assert_eq!(buffer.as_bytes(), &[1, 2, 3]);
        assert_eq!(copy.as_bytes(), &[0xFF, 2, 3]);
    }

    #[test]
    fn test_slice_keeps_endianness() {
        let buffer = ByteBuffer::from_bytes(vec![0x01, 0x02]).with_endianness(Endianness::Little);
        let copy = buffer.slice(0, None).unwrap();
        assert_eq!(copy.endianness(), Endianness::Little);
        assert_eq!(copy.reader().read_u16().unwrap(), 0x0201);
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let buffer = ByteBuffer::alloc(4);
        assert!(matches!(
            buffer.slice(2, Some(3)),
            Err(BufferError::OutOfBounds {
                offset: 2,
                len: 3,
                size: 4
            })
        ));
        assert!(buffer.slice(5, None).is_err());
        assert_eq!(buffer.slice(4, None).unwrap().len(), 0);
    }

    #[test]
    fn test_copy_into_same_offset() {
        let source = ByteBuffer::from_bytes(vec![9, 8, 7]);
        let mut target = ByteBuffer::alloc(5);
        source.copy_into(&mut target, 0, None, None).unwrap();
        assert_eq!(target.as_bytes(), &[9, 8, 7, 0, 0]);
    }

    #[test]
    fn test_copy_into_with_destination_offset() {
        let source = ByteBuffer::from_bytes(vec![9, 8, 7]);
        let mut target = ByteBuffer::alloc(5);
        source.copy_into(&mut target, 1, Some(2), Some(3)).unwrap();
        assert_eq!(target.as_bytes(), &[0, 0, 0, 8, 7]);
    }

    #[test]
    fn test_copy_into_never_grows_target() {
        let source = ByteBuffer::from_bytes(vec![1, 2, 3, 4]);
        let mut target = ByteBuffer::alloc(2);
        let result = source.copy_into(&mut target, 0, None, None);
        assert!(matches!(result, Err(BufferError::OutOfBounds { .. })));
        assert_eq!(target.as_bytes(), &[0, 0]);
    }

    #[test]
    fn test_checked_range_overflow() {
        assert!(checked_range(usize::MAX, 2, 10).is_err());
        assert_eq!(checked_range(2, 3, 5).unwrap(), 2..5);
    }
}
