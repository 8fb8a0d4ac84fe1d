//! Sort-order preserving encoding for key values.
//!
//! This module provides a binary encoding for [`Value`] types that preserves
//! ordering when comparing the encoded bytes. Item keys and index entry keys
//! are concatenations of these encodings, so a scan over a table visits keys
//! in [`Value`] order, component by component.
//!
//! # Encoding Design
//!
//! ## Type Ordering
//!
//! Different types are ordered by their type tag (sorted from lowest to highest):
//! - `Null` (0x00) - sorts first
//! - `Bool` (0x01) - false before true
//! - `Int` (0x02) - negative to positive
//! - `Float` (0x03) - IEEE 754 total order
//! - `String` (0x04) - lexicographic UTF-8 order
//! - `Symbol` (0x05) - lexicographic UTF-8 order
//! - `Bytes` (0x06) - lexicographic byte order
//! - `Array` (0x07) - element-wise
//! - `Map` (0x08) - entry-wise in key order
//!
//! ## Integer Encoding
//!
//! Integers use a "sign-flip" encoding:
//! - XOR with `0x8000_0000_0000_0000` flips the sign bit
//! - This makes negative numbers sort before positive numbers
//! - Result is stored in big-endian format
//!
//! ## Float Encoding
//!
//! Floats use IEEE 754 bit representation with transformations:
//! - Sign bit clear: flip sign bit (XOR with `0x8000_0000_0000_0000`)
//! - Sign bit set: flip all bits
//!
//! This matches [`f64::total_cmp`], including `NaN` payloads and signed zeros.
//!
//! ## String and Bytes Encoding
//!
//! Strings, symbols and bytes use null-terminated encoding with escape sequences:
//! - `0x00` in the data is escaped to `0x00 0x01`
//! - The sequence ends with `0x00 0x00` (double null terminator)
//!
//! This preserves lexicographic ordering: `"a" < "aa" < "ab" < "b"`.
//!
//! ## Array and Map Encoding
//!
//! Each element (or map entry) is preceded by a `0x01` marker and the
//! sequence ends with `0x00`, so a shorter prefix sorts before its extensions.
//! Map entries are the escaped key followed by the encoded value.
//!
//! # Example
//!
//! ```
//! use slugdb_core::encoding::sortable::{decode_sortable, encode_sortable};
//! use slugdb_core::Value;
//!
//! let values = vec![Value::Int(-10), Value::Int(0), Value::Int(10)];
//!
//! let mut encoded: Vec<_> = values.iter().map(encode_sortable).collect();
//!
//! // Sorting encoded bytes gives the same order as sorting values
//! encoded.sort();
//!
//! let decoded: Vec<_> = encoded.iter().map(|e| decode_sortable(e).unwrap()).collect();
//!
//! assert_eq!(decoded, values);
//! ```

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::types::Value;

/// Type tags for sortable encoding.
///
/// These tags define the sort order of different types.
pub mod tags {
    /// Null values sort first.
    pub const NULL: u8 = 0x00;
    /// Boolean values (false=0x00, true=0x01).
    pub const BOOL: u8 = 0x01;
    /// 64-bit signed integers.
    pub const INT: u8 = 0x02;
    /// 64-bit floating point numbers.
    pub const FLOAT: u8 = 0x03;
    /// UTF-8 strings.
    pub const STRING: u8 = 0x04;
    /// Symbols.
    pub const SYMBOL: u8 = 0x05;
    /// Raw bytes.
    pub const BYTES: u8 = 0x06;
    /// Arrays of values.
    pub const ARRAY: u8 = 0x07;
    /// Nested maps.
    pub const MAP: u8 = 0x08;
}

/// Constant for flipping the sign bit of 64-bit values.
const SIGN_FLIP_I64: u64 = 0x8000_0000_0000_0000;

/// Escape byte: when we see 0x00 in data, we output 0x00 0x01
const ESCAPE_BYTE: u8 = 0x01;
/// Terminator: end of string/bytes is marked by 0x00 0x00
const TERMINATOR: u8 = 0x00;

/// Marks another element in an array or map.
const ELEMENT_MARKER: u8 = 0x01;
/// Marks the end of an array or map.
const END_MARKER: u8 = 0x00;

/// Encode bytes with null-escape encoding.
///
/// This encoding preserves lexicographic order:
/// - Each 0x00 in input becomes 0x00 0x01
/// - Sequence ends with 0x00 0x00
fn encode_bytes_escaped(data: &[u8], buf: &mut Vec<u8>) {
    for &byte in data {
        if byte == 0x00 {
            buf.push(0x00);
            buf.push(ESCAPE_BYTE);
        } else {
            buf.push(byte);
        }
    }
    buf.push(TERMINATOR);
    buf.push(TERMINATOR);
}

/// Decode bytes with null-escape encoding.
///
/// Returns the decoded bytes and the number of input bytes consumed.
fn decode_bytes_escaped(data: &[u8]) -> Result<(Vec<u8>, usize), CoreError> {
    let mut result = Vec::new();
    let mut i = 0;

    while i < data.len() {
        if data[i] == 0x00 {
            match data.get(i + 1) {
                Some(&TERMINATOR) => return Ok((result, i + 2)),
                Some(&ESCAPE_BYTE) => {
                    result.push(0x00);
                    i += 2;
                }
                Some(other) => {
                    return Err(CoreError::Decoding(format!(
                        "invalid escape sequence: 0x00 0x{other:02x}"
                    )));
                }
                None => {
                    return Err(CoreError::Decoding("unexpected end of escaped bytes".into()));
                }
            }
        } else {
            result.push(data[i]);
            i += 1;
        }
    }

    Err(CoreError::Decoding("missing terminator in escaped bytes".into()))
}

fn decode_text(data: &[u8]) -> Result<(String, usize), CoreError> {
    let (bytes, consumed) = decode_bytes_escaped(data)?;
    let text =
        String::from_utf8(bytes).map_err(|e| CoreError::Decoding(format!("invalid UTF-8: {e}")))?;
    Ok((text, consumed))
}

/// Encode a value into a sort-order preserving byte representation.
///
/// Every [`Value`] variant is supported, so any attribute can serve as a key.
///
/// # Example
///
/// ```
/// use slugdb_core::encoding::sortable::encode_sortable;
/// use slugdb_core::Value;
///
/// let encoded_neg = encode_sortable(&Value::Int(-5));
/// let encoded_pos = encode_sortable(&Value::Int(5));
///
/// // Negative numbers sort before positive numbers
/// assert!(encoded_neg < encoded_pos);
/// ```
#[must_use]
pub fn encode_sortable(value: &Value) -> Vec<u8> {
    let mut buf = Vec::with_capacity(sortable_encoded_size(value));
    encode_sortable_to(value, &mut buf);
    buf
}

/// Append the sortable encoding of `value` to `buf`.
///
/// Encodings are self-delimiting, so several values can be concatenated into
/// one composite key and still compare component by component.
#[allow(clippy::cast_sign_loss)]
pub fn encode_sortable_to(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Null => buf.push(tags::NULL),

        Value::Bool(b) => {
            buf.push(tags::BOOL);
            buf.push(u8::from(*b));
        }

        Value::Int(i) => {
            buf.push(tags::INT);
            // Flip sign bit to make negative numbers sort before positive
            let encoded = (*i as u64) ^ SIGN_FLIP_I64;
            buf.extend_from_slice(&encoded.to_be_bytes());
        }

        Value::Float(f) => {
            buf.push(tags::FLOAT);
            let bits = f.to_bits();
            let encoded = if bits & SIGN_FLIP_I64 == 0 { bits ^ SIGN_FLIP_I64 } else { !bits };
            buf.extend_from_slice(&encoded.to_be_bytes());
        }

        Value::String(s) => {
            buf.push(tags::STRING);
            encode_bytes_escaped(s.as_bytes(), buf);
        }

        Value::Symbol(s) => {
            buf.push(tags::SYMBOL);
            encode_bytes_escaped(s.as_bytes(), buf);
        }

        Value::Bytes(b) => {
            buf.push(tags::BYTES);
            encode_bytes_escaped(b, buf);
        }

        Value::Array(values) => {
            buf.push(tags::ARRAY);
            for element in values {
                buf.push(ELEMENT_MARKER);
                encode_sortable_to(element, buf);
            }
            buf.push(END_MARKER);
        }

        Value::Map(map) => {
            buf.push(tags::MAP);
            for (key, element) in map {
                buf.push(ELEMENT_MARKER);
                encode_bytes_escaped(key.as_bytes(), buf);
                encode_sortable_to(element, buf);
            }
            buf.push(END_MARKER);
        }
    }
}

/// Decode a sortable-encoded value back to its original form.
///
/// # Errors
///
/// Returns [`CoreError::Decoding`] if the bytes are malformed, incomplete,
/// or followed by trailing data.
///
/// # Example
///
/// ```
/// use slugdb_core::encoding::sortable::{decode_sortable, encode_sortable};
/// use slugdb_core::Value;
///
/// let original = Value::symbol("metadata");
/// let encoded = encode_sortable(&original);
/// let decoded = decode_sortable(&encoded).unwrap();
///
/// assert_eq!(decoded, original);
/// ```
pub fn decode_sortable(bytes: &[u8]) -> Result<Value, CoreError> {
    let (value, consumed) = decode_sortable_with_len(bytes)?;
    if consumed != bytes.len() {
        return Err(CoreError::Decoding(format!(
            "trailing bytes after sortable value: {}",
            bytes.len() - consumed
        )));
    }
    Ok(value)
}

/// Decode a sortable-encoded value and return the number of bytes consumed.
///
/// This is useful when the encoded value is part of a larger key.
///
/// # Errors
///
/// Returns [`CoreError::Decoding`] if the bytes are malformed or incomplete.
#[allow(clippy::cast_possible_wrap)]
pub fn decode_sortable_with_len(bytes: &[u8]) -> Result<(Value, usize), CoreError> {
    let (&tag, rest) = bytes
        .split_first()
        .ok_or_else(|| CoreError::Decoding("unexpected end of input in sortable decode".into()))?;

    match tag {
        tags::NULL => Ok((Value::Null, 1)),

        tags::BOOL => {
            let b = rest
                .first()
                .ok_or_else(|| CoreError::Decoding("unexpected end of input reading bool".into()))?;
            Ok((Value::Bool(*b != 0), 2))
        }

        tags::INT => {
            let encoded = read_u64(rest, "int")?;
            // Flip sign bit back
            Ok((Value::Int((encoded ^ SIGN_FLIP_I64) as i64), 9))
        }

        tags::FLOAT => {
            let encoded = read_u64(rest, "float")?;
            let bits =
                if encoded & SIGN_FLIP_I64 == 0 { !encoded } else { encoded ^ SIGN_FLIP_I64 };
            Ok((Value::Float(f64::from_bits(bits)), 9))
        }

        tags::STRING => {
            let (s, consumed) = decode_text(rest)?;
            Ok((Value::String(s), 1 + consumed))
        }

        tags::SYMBOL => {
            let (s, consumed) = decode_text(rest)?;
            Ok((Value::Symbol(s), 1 + consumed))
        }

        tags::BYTES => {
            let (b, consumed) = decode_bytes_escaped(rest)?;
            Ok((Value::Bytes(b), 1 + consumed))
        }

        tags::ARRAY => {
            let mut values = Vec::new();
            let mut offset = 0;
            loop {
                match rest.get(offset) {
                    Some(&END_MARKER) => return Ok((Value::Array(values), 1 + offset + 1)),
                    Some(&ELEMENT_MARKER) => {
                        let (element, consumed) = decode_sortable_with_len(&rest[offset + 1..])?;
                        values.push(element);
                        offset += 1 + consumed;
                    }
                    Some(other) => {
                        return Err(CoreError::Decoding(format!(
                            "invalid array marker: {other:#x}"
                        )));
                    }
                    None => return Err(CoreError::Decoding("unterminated array".into())),
                }
            }
        }

        tags::MAP => {
            let mut map = BTreeMap::new();
            let mut offset = 0;
            loop {
                match rest.get(offset) {
                    Some(&END_MARKER) => return Ok((Value::Map(map), 1 + offset + 1)),
                    Some(&ELEMENT_MARKER) => {
                        let (key, key_len) = decode_text(&rest[offset + 1..])?;
                        let (element, value_len) =
                            decode_sortable_with_len(&rest[offset + 1 + key_len..])?;
                        map.insert(key, element);
                        offset += 1 + key_len + value_len;
                    }
                    Some(other) => {
                        return Err(CoreError::Decoding(format!("invalid map marker: {other:#x}")));
                    }
                    None => return Err(CoreError::Decoding("unterminated map".into())),
                }
            }
        }

        _ => Err(CoreError::Decoding(format!("unknown sortable type tag: {tag:#x}"))),
    }
}

fn read_u64(data: &[u8], what: &str) -> Result<u64, CoreError> {
    let raw: [u8; 8] = data
        .get(..8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| CoreError::Decoding(format!("unexpected end of input reading {what}")))?;
    Ok(u64::from_be_bytes(raw))
}

/// Compute the estimated size of a sortable-encoded value.
///
/// This is useful for pre-allocating buffers. The actual size may be larger
/// if strings or bytes contain null bytes (which get escaped).
#[must_use]
pub fn sortable_encoded_size(value: &Value) -> usize {
    match value {
        Value::Null => 1,
        Value::Bool(_) => 2,
        Value::Int(_) | Value::Float(_) => 9,
        // tag(1) + data + terminator(2)
        Value::String(s) | Value::Symbol(s) => 1 + s.len() + 2,
        Value::Bytes(b) => 1 + b.len() + 2,
        Value::Array(values) => {
            2 + values.iter().map(|v| 1 + sortable_encoded_size(v)).sum::<usize>()
        }
        Value::Map(map) => {
            2 + map.iter().map(|(k, v)| 1 + k.len() + 2 + sortable_encoded_size(v)).sum::<usize>()
        }
    }
}

/// The first key after every key that starts with `prefix`.
///
/// Used as the exclusive upper bound of a prefix scan. Returns `None` when
/// no such key exists (the prefix is empty or all `0xFF`), in which case the
/// scan is unbounded above.
///
/// # Example
///
/// ```
/// use slugdb_core::encoding::sortable::prefix_end;
///
/// assert_eq!(prefix_end(&[0x01, 0x02]), Some(vec![0x01, 0x03]));
/// assert_eq!(prefix_end(&[0x01, 0xFF]), Some(vec![0x02]));
/// assert_eq!(prefix_end(&[0xFF]), None);
/// ```
#[must_use]
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let last = prefix.iter().rposition(|&b| b < u8::MAX)?;
    let mut end = prefix[..=last].to_vec();
    end[last] += 1;
    Some(end)
}

/// Decode a composite key made of `N` concatenated sortable values.
///
/// # Errors
///
/// Returns [`CoreError::Decoding`] if any component is malformed or if bytes
/// remain after the last one.
pub fn decode_sortable_tuple<const N: usize>(bytes: &[u8]) -> Result<[Value; N], CoreError> {
    let mut parts = Vec::with_capacity(N);
    let mut offset = 0;
    while parts.len() < N {
        let (value, consumed) = decode_sortable_with_len(&bytes[offset..])?;
        parts.push(value);
        offset += consumed;
    }
    if offset != bytes.len() {
        return Err(CoreError::Decoding(format!(
            "trailing bytes after composite key: {}",
            bytes.len() - offset
        )));
    }
    parts
        .try_into()
        .map_err(|_| CoreError::Decoding(format!("expected {N} key components")))
}
