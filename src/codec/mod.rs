//! Record Codec Module
//!
//! Serializes key-value records and metadata records to and from byte
//! streams.
//!
//! ## Responsibilities
//! - Typed keys and the closed set of key types
//! - Sequential record streams for bucket files
//! - Single-record encoding for the metadata file
//!
//! ## Bucket File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Record 1 (bincode)                      │
//! │ ┌───────────┬──────────┬──────────────┐ │
//! │ │ Key tag(4)│ Key data │ Val len(8)+V │ │
//! │ └───────────┴──────────┴──────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Record 2 ...                            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Records are concatenated with no extra framing; bincode's own length
//! prefixes delimit them. End of file after a whole record is the end of the
//! stream, anything shorter is a corrupt bucket.

mod record;
mod reader;
mod writer;

pub use record::{Key, KeyType, Record};
pub use reader::RecordReader;
pub use writer::RecordWriter;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{KvError, Result};

/// Maximum encoded size of a single record (16 MB)
pub const MAX_RECORD_SIZE: u64 = 16 * 1024 * 1024;

/// Encoding options shared by every on-disk record
pub(crate) fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_RECORD_SIZE)
}

/// Encode a single value into a buffer
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    options()
        .serialize(value)
        .map_err(|e| KvError::Serialization(e.to_string()))
}

/// Decode a single value that must span the whole buffer
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    options()
        .reject_trailing_bytes()
        .deserialize(bytes)
        .map_err(|e| KvError::Decode(e.to_string()))
}
