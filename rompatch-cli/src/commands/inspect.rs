//! Inspect command - summarise a local IPS file.

use std::path::Path;

use rompatch::ips::{IpsPatch, PatchRecord};

use crate::error::CliError;

/// Run the inspect command.
pub fn run(path: &Path, show_records: bool) -> Result<(), CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let patch = IpsPatch::parse(&bytes).map_err(|source| CliError::InvalidPatch {
        path: path.to_path_buf(),
        source,
    })?;

    println!("{}", path.display());
    println!("{}", patch);

    let written: usize = patch.records.iter().map(PatchRecord::len).sum();
    println!("Bytes written: {}", written);
    if let Some(end) = patch.records.iter().map(PatchRecord::end).max() {
        println!("Highest offset: {:#x}", end);
    }

    if show_records {
        println!();
        for record in &patch.records {
            println!("  {}", describe(record));
        }
    }

    Ok(())
}

fn describe(record: &PatchRecord) -> String {
    match record {
        PatchRecord::Rle {
            offset,
            length,
            value,
        } => format!("{:#08x}  RLE      {:>6} x {:#04x}", offset, length, value),
        PatchRecord::Literal { offset, data } => {
            format!("{:#08x}  literal  {:>6} bytes", offset, data.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_describe_records() {
        let rle = PatchRecord::Rle {
            offset: 0x10,
            length: 4,
            value: 0xFF,
        };
        assert_eq!(describe(&rle), "0x000010  RLE           4 x 0xff");

        let literal = PatchRecord::Literal {
            offset: 0x20,
            data: vec![1, 2, 3],
        };
        assert_eq!(describe(&literal), "0x000020  literal       3 bytes");
    }

    #[test]
    fn test_run_rejects_invalid_patch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.ips");
        std::fs::write(&path, b"NOPE").unwrap();

        assert!(matches!(
            run(&path, false),
            Err(CliError::InvalidPatch { .. })
        ));
    }

    #[test]
    fn test_run_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            run(&temp.path().join("missing.ips"), false),
            Err(CliError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_run_valid_patch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ok.ips");
        let mut patch = IpsPatch::new();
        patch.add_rle(0, 8, 0xAA);
        std::fs::write(&path, patch.export().unwrap().into_bytes()).unwrap();

        assert!(run(&path, true).is_ok());
    }
}
