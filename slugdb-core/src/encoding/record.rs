//! Versioned `bincode` records.
//!
//! # Format
//!
//! A record is encoded as:
//! - 1 byte format version
//! - the `bincode` standard-config serialization of the value

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;

/// Format version byte written ahead of every record.
const FORMAT_VERSION: u8 = 1;

/// Encode `value` as a versioned record.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if serialization fails.
pub fn encode_record<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    let body = bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| CoreError::Encoding(e.to_string()))?;

    let mut buf = Vec::with_capacity(1 + body.len());
    buf.push(FORMAT_VERSION);
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Decode a versioned record.
///
/// # Errors
///
/// Returns [`CoreError::Decoding`] if the input is empty, carries an
/// unsupported format version, or does not deserialize into `T`.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    let (&version, body) = bytes
        .split_first()
        .ok_or_else(|| CoreError::Decoding("unexpected end of input".to_owned()))?;

    if version != FORMAT_VERSION {
        return Err(CoreError::Decoding(format!(
            "unsupported format version: {version}, expected {FORMAT_VERSION}"
        )));
    }

    let (value, _) = bincode::serde::decode_from_slice(body, bincode::config::standard())
        .map_err(|e| CoreError::Decoding(e.to_string()))?;
    Ok(value)
}
