//! IPS patch model: records and the patch container.

use std::fmt;

/// One offset-addressed overwrite instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchRecord {
    /// Write `value` `length` times starting at `offset`.
    Rle { offset: u32, length: u16, value: u8 },
    /// Write `data` verbatim starting at `offset`.
    Literal { offset: u32, data: Vec<u8> },
}

impl PatchRecord {
    /// Absolute target offset of the first written byte.
    pub fn offset(&self) -> u32 {
        match self {
            Self::Rle { offset, .. } | Self::Literal { offset, .. } => *offset,
        }
    }

    /// Number of bytes the record writes.
    pub fn len(&self) -> usize {
        match self {
            Self::Rle { length, .. } => *length as usize,
            Self::Literal { data, .. } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First offset past the bytes this record writes.
    pub fn end(&self) -> usize {
        self.offset() as usize + self.len()
    }

    pub fn is_rle(&self) -> bool {
        matches!(self, Self::Rle { .. })
    }
}

/// A parsed IPS patch.
///
/// Records keep their insertion order, which is also the order they are
/// written in on export and applied in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IpsPatch {
    pub records: Vec<PatchRecord>,
    /// Exact output length, overriding record-driven expansion.
    pub truncate: Option<u32>,
}

impl IpsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal record.
    pub fn add_literal(&mut self, offset: u32, data: impl Into<Vec<u8>>) {
        self.records.push(PatchRecord::Literal {
            offset,
            data: data.into(),
        });
    }

    /// Append a run-length record.
    pub fn add_rle(&mut self, offset: u32, length: u16, value: u8) {
        self.records.push(PatchRecord::Rle {
            offset,
            length,
            value,
        });
    }

    pub fn with_truncate(mut self, truncate: u32) -> Self {
        self.truncate = Some(truncate);
        self
    }

    /// Truncate length that actually takes effect.
    ///
    /// A stored length of zero is treated as absent.
    pub fn effective_truncate(&self) -> Option<u32> {
        self.truncate.filter(|&t| t != 0)
    }

    pub fn literal_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_rle()).count()
    }

    pub fn rle_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_rle()).count()
    }

    /// Length of the buffer [`apply`](Self::apply) produces for a source of
    /// `source_len` bytes.
    pub fn target_size(&self, source_len: usize) -> usize {
        match self.effective_truncate() {
            Some(truncate) => truncate as usize,
            None => self
                .records
                .iter()
                .map(PatchRecord::end)
                .fold(source_len, usize::max),
        }
    }
}

impl fmt::Display for IpsPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Literal records: {}", self.literal_count())?;
        writeln!(f, "RLE records: {}", self.rle_count())?;
        write!(f, "Total records: {}", self.records.len())?;
        if let Some(truncate) = self.effective_truncate() {
            write!(f, "\nTruncate at: {:#x}", truncate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_extent() {
        let rle = PatchRecord::Rle {
            offset: 0x10,
            length: 4,
            value: 0xFF,
        };
        assert_eq!(rle.offset(), 0x10);
        assert_eq!(rle.len(), 4);
        assert_eq!(rle.end(), 0x14);
        assert!(rle.is_rle());

        let literal = PatchRecord::Literal {
            offset: 2,
            data: vec![0xAA, 0xBB],
        };
        assert_eq!(literal.end(), 4);
        assert!(!literal.is_rle());
    }

    #[test]
    fn test_builders_preserve_order() {
        let mut patch = IpsPatch::new();
        patch.add_rle(8, 2, 0x00);
        patch.add_literal(0, vec![1, 2, 3]);

        assert_eq!(patch.records[0].offset(), 8);
        assert_eq!(patch.records[1].offset(), 0);
        assert_eq!(patch.rle_count(), 1);
        assert_eq!(patch.literal_count(), 1);
    }

    #[test]
    fn test_target_size_expands_to_furthest_record() {
        let mut patch = IpsPatch::new();
        patch.add_literal(2, vec![1, 2]);
        patch.add_rle(10, 6, 0xEE);
        patch.add_literal(4, vec![9]);

        assert_eq!(patch.target_size(8), 16);
        assert_eq!(patch.target_size(32), 32);
    }

    #[test]
    fn test_target_size_uses_truncate() {
        let mut patch = IpsPatch::new().with_truncate(6);
        patch.add_rle(100, 10, 0);
        assert_eq!(patch.target_size(8), 6);
        assert_eq!(patch.target_size(2), 6);
    }

    #[test]
    fn test_zero_truncate_is_ignored() {
        let patch = IpsPatch::new().with_truncate(0);
        assert_eq!(patch.effective_truncate(), None);
        assert_eq!(patch.target_size(5), 5);
    }

    #[test]
    fn test_summary_display() {
        let mut patch = IpsPatch::new().with_truncate(0x200);
        patch.add_literal(0, vec![1]);
        patch.add_literal(4, vec![2]);
        patch.add_rle(8, 3, 0);

        let summary = patch.to_string();
        assert_eq!(
            summary,
            "Literal records: 2\nRLE records: 1\nTotal records: 3\nTruncate at: 0x200"
        );
    }
}
