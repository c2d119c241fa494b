//! Record codec
//!
//! Encoding and decoding between caller records and their canonical on-disk
//! bytes. The engine never looks inside a record past this boundary.
//!
//! ## Record Format
//! ```text
//! {
//! <TAB>"Name": "Alice",
//! <TAB>"Age": "30"
//! }<LF>
//! ```
//! Pretty-printed JSON, one tab per nesting level, exactly one trailing newline.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{CacheDbError, Result};

/// Indentation used for every nesting level
pub const INDENT: &[u8] = b"\t";

/// Encode a record to its canonical byte form
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(128);
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    value.serialize(&mut serializer).map_err(CacheDbError::Encode)?;

    buf.push(b'\n');
    Ok(buf)
}

/// Decode a record from its canonical byte form
///
/// Surrounding whitespace (including the trailing newline) is accepted.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(CacheDbError::Decode)
}
