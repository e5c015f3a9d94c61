//! # DNS Name Codec
//!
//! Converts textual domain names into their RFC 1035 wire representation and back.
//!
//! - [`encode_name`] / [`MessageCompressor::compress`] turn `"www.example.com"` into
//!   length-prefixed labels, optionally reusing already written suffixes through
//!   compression pointers.
//! - [`decode_name`] reads a (possibly compressed) name out of a full DNS message.
//!
//! Both directions enforce the RFC 1035 limits: 63 octets per label and 255 octets for
//! the whole encoded name.
//!
//! # Example
//!
//! ```rust
//! use digrr::dns::compressor::{decode_name, encode_name};
//!
//! let wire = encode_name("google.com").unwrap();
//! assert_eq!(wire[0], 6);
//!
//! let (name, next) = decode_name(&wire, 0).unwrap();
//! assert_eq!(name, "google.com");
//! assert_eq!(next, wire.len());
//! ```
//!
//! # References
//! - RFC1035 §3.1 (Name space definitions)
//! - RFC1035 §4.1.4 (Message compression)

mod decode;
mod encode;

pub use self::decode::decode_name;
pub use self::encode::{MessageCompressor, encode_name};

use thiserror::Error;

/// Maximum length of a single label, in octets.
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum length of an encoded name (length octets, labels and terminator), in octets.
pub const MAX_NAME_LEN: usize = 255;

/// Top two bits of a length octet that mark a compression pointer.
pub(crate) const POINTER_FLAG: u8 = 0b1100_0000;

/// Largest offset a 14-bit compression pointer can address.
pub(crate) const POINTER_MAX_OFFSET: usize = 0x3FFF;

/// Errors raised while encoding or decoding domain names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressorErrors {
    #[error("Label too long (>63): {0}")]
    LabelTooLong(String),
    #[error("Name is too long (>255): {0}")]
    NameTooLong(String),
    #[error("Name contains an empty label: {0}")]
    EmptyLabel(String),
    #[error("Name runs past the end of the message (offset {0})")]
    TruncatedName(usize),
    #[error("Compression pointer loop detected (last target {0})")]
    CompressionLoop(usize),
    #[error("Compression pointer {pointer} is outside of the {len}-byte message")]
    PointerOutOfRange { pointer: usize, len: usize },
    #[error("Reserved label type in length octet 0x{0:02x}")]
    ReservedLabelType(u8),
}
