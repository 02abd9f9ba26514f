//! SHA-256 advisory check of the input ROM.
//!
//! A mismatch never blocks patching: it is reported as
//! [`HashCheck::Mismatch`] and logged as a warning, and the caller decides
//! what to tell the user.

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::buffer::ByteBuffer;

/// SHA-256 of the clean ROM the catalog's patches are built against.
pub const EXPECTED_ROM_SHA256: &str =
    "a9dec84dfe7f62ab2220bafaef7479da0929d066ece16a6885f6226db19085af";

/// Outcome of comparing a ROM against its expected digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashCheck {
    Match,
    Mismatch { expected: String, actual: String },
}

impl HashCheck {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Lowercase hexadecimal SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Compare `rom` against `expected` (hex, any case).
pub fn check_rom(rom: &ByteBuffer, expected: &str) -> HashCheck {
    let actual = sha256_hex(rom.as_bytes());
    let expected = expected.trim().to_ascii_lowercase();

    if actual == expected {
        debug!(sha256 = %actual, "ROM checksum matches");
        HashCheck::Match
    } else {
        warn!(
            expected = %expected,
            actual = %actual,
            "ROM checksum does not match the expected image"
        );
        HashCheck::Mismatch { expected, actual }
    }
}
