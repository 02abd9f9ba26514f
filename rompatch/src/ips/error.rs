//! Error types for the IPS codec.

use thiserror::Error;

use crate::buffer::BufferError;

/// Result type for IPS operations.
pub type IpsResult<T> = Result<T, IpsError>;

/// Errors raised while parsing, exporting, or applying IPS patches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IpsError {
    /// The data does not start with the `PATCH` marker.
    #[error("invalid magic: expected \"PATCH\"")]
    InvalidMagic,

    /// The data ended before the `EOF` terminator.
    #[error("patch data ended without an EOF marker")]
    MissingTerminator,

    /// The data ended in the middle of a record.
    #[error("patch data ended inside the record at byte {position}")]
    UnexpectedEnd {
        position: usize,
        #[source]
        source: BufferError,
    },

    /// A record offset does not fit 24 bits or collides with the terminator.
    #[error("record offset {0:#08x} cannot be encoded")]
    UnencodableOffset(u32),

    /// A record length is zero or does not fit 16 bits.
    #[error("record length {0} cannot be encoded")]
    UnencodableLength(usize),

    /// The truncate length does not fit 24 bits.
    #[error("truncate length {0:#x} cannot be encoded")]
    UnencodableTruncate(u32),

    /// A buffer access failed while building the output.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            IpsError::InvalidMagic.to_string(),
            "invalid magic: expected \"PATCH\""
        );
        assert_eq!(
            IpsError::UnencodableOffset(0x454F46).to_string(),
            "record offset 0x454f46 cannot be encoded"
        );
    }

    #[test]
    fn test_unexpected_end_keeps_source() {
        use std::error::Error;

        let err = IpsError::UnexpectedEnd {
            position: 8,
            source: BufferError::OutOfBounds {
                offset: 8,
                len: 2,
                size: 9,
            },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("byte 8"));
    }
}
