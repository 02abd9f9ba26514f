//! Error types for byte buffer access.

use thiserror::Error;

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors raised by [`ByteBuffer`](super::ByteBuffer) and its cursors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// An access touched bytes outside the buffer.
    #[error("out of bounds: {len} bytes at offset {offset} exceed buffer size {size}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },
}

impl BufferError {
    pub(crate) fn out_of_bounds(offset: usize, len: usize, size: usize) -> Self {
        Self::OutOfBounds { offset, len, size }
    }
}
