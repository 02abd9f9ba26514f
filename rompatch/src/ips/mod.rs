//! IPS (International Patching System) codec.
//!
//! IPS is a record-based diff: a `PATCH` header, a list of offset-addressed
//! writes, an `EOF` terminator, and an optional 3-byte truncate length.
//!
//! ```text
//! "PATCH"
//! ┌ offset:u24 ─ length:u16 (> 0) ─ data[length] ┐   literal record
//! └ offset:u24 ─ 0x0000 ─ run:u16 ─ value:u8     ┘   RLE record
//! ...
//! "EOF" [truncate:u24]
//! ```
//!
//! All integers are big-endian. A zero length field always denotes an RLE
//! record; the format has no way to express an empty literal.
//!
//! # Example
//!
//! ```
//! use rompatch::buffer::ByteBuffer;
//! use rompatch::ips::IpsPatch;
//!
//! let mut patch = IpsPatch::new();
//! patch.add_literal(2, vec![0xAA, 0xBB]);
//!
//! let encoded = patch.export().unwrap();
//! let decoded = IpsPatch::parse(encoded.as_bytes()).unwrap();
//!
//! let output = decoded.apply(&ByteBuffer::alloc(4)).unwrap();
//! assert_eq!(output.as_bytes(), &[0x00, 0x00, 0xAA, 0xBB]);
//! ```

mod apply;
mod error;
mod export;
mod parse;
mod record;

pub use error::{IpsError, IpsResult};
pub use record::{IpsPatch, PatchRecord};

/// File header.
pub const MAGIC: &[u8; 5] = b"PATCH";

/// `"EOF"` read as a 24-bit big-endian integer.
pub const EOF_MARKER: u32 = 0x454F46;

/// Length field value that introduces an RLE record.
pub const RLE_MARKER: u16 = 0x0000;

/// Largest offset a 24-bit field can hold.
pub const MAX_OFFSET: u32 = 0x00FF_FFFF;
