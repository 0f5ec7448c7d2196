//! Value Codec
//!
//! Converts sdb values to the bytes stored in memcache and back.

use serde_json::Value;

use crate::error::Result;

/// Encodes a value as compact JSON text.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decodes stored bytes.
///
/// Payloads that are not JSON were written by some other memcache user and
/// come back as a plain string.
pub fn decode(raw: &[u8]) -> Value {
    serde_json::from_slice(raw)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(raw).into_owned()))
}
