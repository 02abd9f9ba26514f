//! IPS decoding.

use tracing::debug;

use super::error::{IpsError, IpsResult};
use super::record::IpsPatch;
use super::{EOF_MARKER, MAGIC, RLE_MARKER};
use crate::buffer::{BufferError, ByteBuffer, ByteReader, Endianness};

impl IpsPatch {
    /// Decode an IPS patch from raw bytes.
    pub fn parse(bytes: &[u8]) -> IpsResult<Self> {
        Self::parse_buffer(&ByteBuffer::from_bytes(bytes))
    }

    /// Decode an IPS patch from a buffer.
    ///
    /// The IPS wire format is always big-endian, whatever the buffer's own
    /// endianness flag says.
    pub fn parse_buffer(buffer: &ByteBuffer) -> IpsResult<Self> {
        let mut reader = buffer.reader_with(Endianness::Big);

        let magic = reader.read_bytes(MAGIC.len()).map_err(|_| IpsError::InvalidMagic)?;
        if magic != MAGIC {
            return Err(IpsError::InvalidMagic);
        }

        let mut patch = IpsPatch::new();

        loop {
            if reader.is_at_end() {
                return Err(IpsError::MissingTerminator);
            }

            let position = reader.offset();
            let offset = reader.read_u24().map_err(|e| unexpected_end(position, e))?;

            if offset == EOF_MARKER {
                if reader.remaining() == 3 {
                    let truncate = reader.read_u24().map_err(|e| unexpected_end(position, e))?;
                    patch.truncate = (truncate != 0).then_some(truncate);
                }
                break;
            }

            read_record(&mut reader, &mut patch, offset, position)?;
        }

        debug!(
            records = patch.records.len(),
            truncate = ?patch.truncate,
            "Parsed IPS patch"
        );

        Ok(patch)
    }
}

fn read_record(
    reader: &mut ByteReader<'_>,
    patch: &mut IpsPatch,
    offset: u32,
    position: usize,
) -> IpsResult<()> {
    let length = reader.read_u16().map_err(|e| unexpected_end(position, e))?;

    if length == RLE_MARKER {
        let run = reader.read_u16().map_err(|e| unexpected_end(position, e))?;
        let value = reader.read_u8().map_err(|e| unexpected_end(position, e))?;
        patch.add_rle(offset, run, value);
    } else {
        let data = reader
            .read_bytes(length as usize)
            .map_err(|e| unexpected_end(position, e))?;
        patch.add_literal(offset, data);
    }

    Ok(())
}

fn unexpected_end(position: usize, source: BufferError) -> IpsError {
    IpsError::UnexpectedEnd { position, source }
}
