//! IPS encoding.

use super::error::{IpsError, IpsResult};
use super::record::{IpsPatch, PatchRecord};
use super::{EOF_MARKER, MAGIC, MAX_OFFSET, RLE_MARKER};
use crate::buffer::ByteBuffer;

impl IpsPatch {
    /// Encode the patch in IPS wire format.
    ///
    /// Records are written in insertion order. Records that the format
    /// cannot express (offsets past 24 bits or equal to the `EOF` marker,
    /// empty or oversized lengths) are rejected rather than silently
    /// corrupted.
    pub fn export(&self) -> IpsResult<ByteBuffer> {
        let mut size = MAGIC.len() + 3;
        for record in &self.records {
            validate(record)?;
            size += match record {
                PatchRecord::Rle { .. } => 3 + 2 + 2 + 1,
                PatchRecord::Literal { data, .. } => 3 + 2 + data.len(),
            };
        }
        let truncate = self.effective_truncate();
        if let Some(truncate) = truncate {
            if truncate > MAX_OFFSET {
                return Err(IpsError::UnencodableTruncate(truncate));
            }
            size += 3;
        }

        let mut buffer = ByteBuffer::alloc(size);
        let mut writer = buffer.writer();

        writer.write_bytes(MAGIC)?;
        for record in &self.records {
            writer.write_u24(record.offset())?;
            match record {
                PatchRecord::Rle { length, value, .. } => {
                    writer.write_u16(RLE_MARKER)?;
                    writer.write_u16(*length)?;
                    writer.write_u8(*value)?;
                }
                PatchRecord::Literal { data, .. } => {
                    writer.write_u16(data.len() as u16)?;
                    writer.write_bytes(data)?;
                }
            }
        }
        writer.write_u24(EOF_MARKER)?;
        if let Some(truncate) = truncate {
            writer.write_u24(truncate)?;
        }

        Ok(buffer)
    }
}

fn validate(record: &PatchRecord) -> IpsResult<()> {
    let offset = record.offset();
    if offset > MAX_OFFSET || offset == EOF_MARKER {
        return Err(IpsError::UnencodableOffset(offset));
    }

    let len = record.len();
    if len == 0 || len > u16::MAX as usize {
        return Err(IpsError::UnencodableLength(len));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_export_empty_patch() {
        let bytes = IpsPatch::new().export().unwrap();
        assert_eq!(bytes.as_bytes(), b"PATCHEOF");
    }

    #[test]
    fn test_export_layout() {
        let mut patch = IpsPatch::new();
        patch.add_literal(2, vec![0xAA, 0xBB]);
        patch.add_rle(0x010203, 0x0100, 0xFF);

        let bytes = patch.export().unwrap();
        let mut expected = b"PATCH".to_vec();
        expected.extend_from_slice(&[0x00, 0x00, 0x02, 0x00, 0x02, 0xAA, 0xBB]);
        expected.extend_from_slice(&[0x01, 0x02, 0x03, 0x00, 0x00, 0x01, 0x00, 0xFF]);
        expected.extend_from_slice(b"EOF");
        assert_eq!(bytes.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_export_truncate() {
        let patch = IpsPatch::new().with_truncate(0x123456);
        let bytes = patch.export().unwrap();
        assert_eq!(bytes.as_bytes(), b"PATCHEOF\x12\x34\x56");

        let reparsed = IpsPatch::parse(bytes.as_bytes()).unwrap();
        assert_eq!(reparsed.truncate, Some(0x123456));
    }

    #[test]
    fn test_export_omits_zero_truncate() {
        let patch = IpsPatch::new().with_truncate(0);
        let bytes = patch.export().unwrap();
        assert_eq!(bytes.as_bytes(), b"PATCHEOF");

        let reparsed = IpsPatch::parse(bytes.as_bytes()).unwrap();
        assert_eq!(reparsed.truncate, None);
    }

    #[test]
    fn test_export_rejects_sentinel_offset() {
        let mut patch = IpsPatch::new();
        patch.add_literal(EOF_MARKER, vec![1]);
        assert_eq!(patch.export(), Err(IpsError::UnencodableOffset(EOF_MARKER)));
    }

    #[test]
    fn test_export_rejects_wide_offset() {
        let mut patch = IpsPatch::new();
        patch.add_rle(0x0100_0000, 1, 0);
        assert_eq!(patch.export(), Err(IpsError::UnencodableOffset(0x0100_0000)));
    }

    #[test]
    fn test_export_rejects_unencodable_lengths() {
        let mut empty = IpsPatch::new();
        empty.add_literal(0, Vec::new());
        assert_eq!(empty.export(), Err(IpsError::UnencodableLength(0)));

        let mut zero_run = IpsPatch::new();
        zero_run.add_rle(0, 0, 0xFF);
        assert_eq!(zero_run.export(), Err(IpsError::UnencodableLength(0)));

        let mut oversized = IpsPatch::new();
        oversized.add_literal(0, vec![0u8; 0x1_0000]);
        assert_eq!(oversized.export(), Err(IpsError::UnencodableLength(0x1_0000)));
    }

    #[test]
    fn test_export_rejects_wide_truncate() {
        let patch = IpsPatch::new().with_truncate(0x0100_0000);
        assert_eq!(
            patch.export(),
            Err(IpsError::UnencodableTruncate(0x0100_0000))
        );
    }

    fn record_strategy() -> impl Strategy<Value = PatchRecord> {
        let offset = (0u32..=MAX_OFFSET).prop_filter("EOF marker", |o| *o != EOF_MARKER);
        prop_oneof![
            (offset.clone(), 1u16..=u16::MAX, any::<u8>()).prop_map(|(offset, length, value)| {
                PatchRecord::Rle {
                    offset,
                    length,
                    value,
                }
            }),
            (offset, prop::collection::vec(any::<u8>(), 1..64))
                .prop_map(|(offset, data)| PatchRecord::Literal { offset, data }),
        ]
    }

    proptest! {
        #[test]
        fn prop_parse_reproduces_exported_records(
            records in prop::collection::vec(record_strategy(), 0..16),
            truncate in prop::option::of(prop_oneof![Just(0u32), 1u32..=MAX_OFFSET])
        ) {
            let patch = IpsPatch { records, truncate };
            let bytes = patch.export().unwrap();
            let parsed = IpsPatch::parse(bytes.as_bytes()).unwrap();
            prop_assert_eq!(parsed.truncate, patch.effective_truncate());
            prop_assert_eq!(parsed.records, patch.records);
        }
    }
}
