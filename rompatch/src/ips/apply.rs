//! Applying IPS patches to a source buffer.

use tracing::debug;

use super::error::IpsResult;
use super::record::{IpsPatch, PatchRecord};
use crate::buffer::ByteBuffer;

impl IpsPatch {
    /// Apply the patch to `source`, producing a new buffer.
    ///
    /// The source is never modified. With a truncate length the output is
    /// the source cut or zero-extended to that length, and no records are
    /// written. Without one, the output grows to cover every record and the
    /// records are written in order, later records overwriting earlier ones.
    pub fn apply(&self, source: &ByteBuffer) -> IpsResult<ByteBuffer> {
        let target_size = self.target_size(source.len());

        if let Some(truncate) = self.effective_truncate() {
            let truncate = truncate as usize;
            // Records are not applied on either truncate branch.
            return if truncate > source.len() {
                let mut target = ByteBuffer::alloc(truncate).with_endianness(source.endianness());
                source.copy_into(&mut target, 0, None, None)?;
                debug!(from = source.len(), to = truncate, "Expanded to truncate length");
                Ok(target)
            } else {
                debug!(from = source.len(), to = truncate, "Truncated");
                Ok(source.slice(0, Some(truncate))?)
            };
        }

        let mut target = if target_size == source.len() {
            source.clone()
        } else {
            let mut target = ByteBuffer::alloc(target_size).with_endianness(source.endianness());
            source.copy_into(&mut target, 0, None, None)?;
            target
        };

        let mut writer = target.writer();
        for record in &self.records {
            writer.seek(record.offset() as usize);
            match record {
                PatchRecord::Rle { length, value, .. } => writer.fill(*value, *length as usize)?,
                PatchRecord::Literal { data, .. } => writer.write_bytes(data)?,
            }
        }

        debug!(
            records = self.records.len(),
            source_size = source.len(),
            target_size,
            "Applied IPS patch"
        );

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Endianness;

    #[test]
    fn test_apply_rle_fills_run() {
        let mut patch = IpsPatch::new();
        patch.add_rle(0, 4, 0xFF);

        let output = patch.apply(&ByteBuffer::alloc(4)).unwrap();
        assert_eq!(output.as_bytes(), &[0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_apply_literal_writes_bytes() {
        let mut patch = IpsPatch::new();
        patch.add_literal(2, vec![0xAA, 0xBB]);

        let output = patch.apply(&ByteBuffer::alloc(4)).unwrap();
        assert_eq!(output.as_bytes(), &[0x00, 0x00, 0xAA, 0xBB]);
    }

    #[test]
    fn test_apply_expands_with_zero_gap() {
        let source = ByteBuffer::from_bytes(vec![1, 2, 3, 4]);
        let mut patch = IpsPatch::new();
        patch.add_literal(6, vec![0xCC, 0xDD]);

        let output = patch.apply(&source).unwrap();
        assert_eq!(output.len(), 8);
        assert_eq!(output.as_bytes(), &[1, 2, 3, 4, 0, 0, 0xCC, 0xDD]);
    }

    #[test]
    fn test_apply_later_records_overwrite() {
        let mut patch = IpsPatch::new();
        patch.add_rle(0, 4, 0x11);
        patch.add_literal(1, vec![0x22, 0x33]);

        let output = patch.apply(&ByteBuffer::alloc(4)).unwrap();
        assert_eq!(output.as_bytes(), &[0x11, 0x22, 0x33, 0x11]);
    }

    #[test]
    fn test_apply_does_not_mutate_source() {
        let source = ByteBuffer::from_bytes(vec![0u8; 4]);
        let mut patch = IpsPatch::new();
        patch.add_rle(0, 4, 0x7F);

        let _ = patch.apply(&source).unwrap();
        assert_eq!(source.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let source = ByteBuffer::from_bytes((0u8..64).collect::<Vec<_>>());
        let mut patch = IpsPatch::new();
        patch.add_literal(3, vec![9, 9, 9]);
        patch.add_rle(60, 10, 0xEE);
        patch.add_literal(0, vec![1]);

        let first = patch.apply(&source.clone()).unwrap();
        let second = patch.apply(&source.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_truncate_shrinks_without_records() {
        let source = ByteBuffer::from_bytes(vec![1, 2, 3, 4, 5, 6]);
        let mut patch = IpsPatch::new().with_truncate(3);
        patch.add_literal(0, vec![0xFF]);

        let output = patch.apply(&source).unwrap();
        assert_eq!(output.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_apply_truncate_expands_without_records() {
        let source = ByteBuffer::from_bytes(vec![1, 2]);
        let mut patch = IpsPatch::new().with_truncate(5);
        patch.add_rle(0, 2, 0xFF);

        let output = patch.apply(&source).unwrap();
        assert_eq!(output.as_bytes(), &[1, 2, 0, 0, 0]);
    }

    #[test]
    fn test_apply_truncate_equal_size_is_copy() {
        let source = ByteBuffer::from_bytes(vec![1, 2, 3]);
        let patch = IpsPatch::new().with_truncate(3);
        assert_eq!(patch.apply(&source).unwrap().as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_apply_keeps_source_endianness() {
        let source = ByteBuffer::alloc(2).with_endianness(Endianness::Little);
        let mut patch = IpsPatch::new();
        patch.add_literal(4, vec![1]);

        let output = patch.apply(&source).unwrap();
        assert_eq!(output.endianness(), Endianness::Little);
    }

    #[test]
    fn test_parse_then_apply() {
        let bytes = b"PATCH\x00\x00\x01\x00\x02\xAB\xCD\x00\x00\x04\x00\x00\x00\x02\xEEEOF";
        let patch = IpsPatch::parse(bytes).unwrap();
        let output = patch.apply(&ByteBuffer::alloc(4)).unwrap();
        assert_eq!(output.as_bytes(), &[0x00, 0xAB, 0xCD, 0x00, 0xEE, 0xEE]);
    }
}
