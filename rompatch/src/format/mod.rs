//! Patch format dispatch.
//!
//! A [`PatchMethod`] names a wire format and knows how to decode raw bytes
//! into a [`PatchFormat`], the type-erased "something that can be applied to
//! a ROM". IPS is the only method today; the enum is the seam for adding
//! more without touching the orchestrator.

use std::fmt;

use thiserror::Error;

use crate::buffer::ByteBuffer;
use crate::ips::{IpsError, IpsPatch};

/// Errors raised while decoding or applying a patch of any format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("IPS: {0}")]
    Ips(#[from] IpsError),
}

/// A decoded patch that can transform a source buffer.
pub trait PatchFormat: Send + Sync + fmt::Display {
    /// The wire format this patch was decoded from.
    fn method(&self) -> PatchMethod;

    /// Produce the patched buffer, leaving `source` untouched.
    fn apply(&self, source: &ByteBuffer) -> Result<ByteBuffer, FormatError>;
}

impl PatchFormat for IpsPatch {
    fn method(&self) -> PatchMethod {
        PatchMethod::Ips
    }

    fn apply(&self, source: &ByteBuffer) -> Result<ByteBuffer, FormatError> {
        Ok(IpsPatch::apply(self, source)?)
    }
}

/// Supported patch wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchMethod {
    Ips,
}

impl PatchMethod {
    /// File extension (without the dot) used by this format.
    pub fn extension(&self) -> &'static str {
        match self {
            PatchMethod::Ips => "ips",
        }
    }

    /// Recognise a format from a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ips" => Some(PatchMethod::Ips),
            _ => None,
        }
    }

    /// Recognise a format from a file name such as `"Legacy.ips"`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Decode raw patch bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<Box<dyn PatchFormat>, FormatError> {
        match self {
            PatchMethod::Ips => Ok(Box::new(IpsPatch::parse(bytes)?)),
        }
    }
}

impl fmt::Display for PatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchMethod::Ips => write!(f, "IPS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(PatchMethod::from_extension("ips"), Some(PatchMethod::Ips));
        assert_eq!(PatchMethod::from_extension("IPS"), Some(PatchMethod::Ips));
        assert_eq!(PatchMethod::from_extension("ups"), None);
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(
            PatchMethod::from_file_name("Legacy v7.41 - New Wilds.ips"),
            Some(PatchMethod::Ips)
        );
        assert_eq!(PatchMethod::from_file_name("readme.txt"), None);
        assert_eq!(PatchMethod::from_file_name("ips"), None);
    }

    #[test]
    fn test_decode_and_apply() {
        let bytes = b"PATCH\x00\x00\x00\x00\x01\x42EOF";
        let patch = PatchMethod::Ips.decode(bytes).unwrap();
        assert_eq!(patch.method(), PatchMethod::Ips);

        let output = patch.apply(&ByteBuffer::alloc(2)).unwrap();
        assert_eq!(output.as_bytes(), &[0x42, 0x00]);
    }

    #[test]
    fn test_decode_error() {
        let err = PatchMethod::Ips.decode(b"NOPE").err().unwrap();
        assert_eq!(err, FormatError::Ips(IpsError::InvalidMagic));
        assert!(err.to_string().starts_with("IPS:"));
    }

    #[test]
    fn test_display() {
        assert_eq!(PatchMethod::Ips.to_string(), "IPS");
        assert_eq!(PatchMethod::Ips.extension(), "ips");
    }
}
