//! Canonical CBOR encoding for deterministic serialization.
//!
//! Every structure that is hashed or signed is first lowered to a
//! [`ciborium`] value tree and then written with these rules:
//! - Map keys must be text; they are sorted by their UTF-8 bytes
//!   (plain lexicographic order, not CBOR length-first order)
//! - Duplicate map keys are rejected
//! - Integers use the smallest valid encoding
//! - Floats are always IEEE-754 binary64 (`0xfb`); NaN and infinities are rejected
//! - Arrays keep their given order
//! - Definite lengths only
//! - Byte strings and tags are rejected
//!
//! The canonical encoding is what makes receipt IDs stable: the same logical
//! content produces identical bytes regardless of construction order or platform.

use ciborium::value::{Integer, Value};
use serde::Serialize;

use crate::crypto::Sha256Hash;
use crate::error::CanonicalError;

/// Lower any serializable value to canonical bytes.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonicalError> {
    let tree =
        Value::serialized(value).map_err(|e| CanonicalError::Serialization(e.to_string()))?;
    canonical_value_bytes(&tree)
}

/// SHA-256 of the canonical bytes of a value.
pub fn canonical_digest<T: Serialize + ?Sized>(value: &T) -> Result<Sha256Hash, CanonicalError> {
    let bytes = canonical_bytes(value)?;
    Ok(Sha256Hash::hash(&bytes))
}

/// Encode an already-built CBOR value tree canonically.
pub fn canonical_value_bytes(value: &Value) -> Result<Vec<u8>, CanonicalError> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CanonicalError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Float(f) => encode_float(buf, *f)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Bytes(_) => return Err(CanonicalError::BytesNotSupported),
        Value::Tag(..) => return Err(CanonicalError::TagNotSupported),
        _ => return Err(CanonicalError::Unsupported),
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a float as binary64, whatever its magnitude.
fn encode_float(buf: &mut Vec<u8>, f: f64) -> Result<(), CanonicalError> {
    if !f.is_finite() {
        return Err(CanonicalError::NonFiniteFloat);
    }
    buf.push(0xfb);
    buf.extend_from_slice(&f.to_be_bytes());
    Ok(())
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<(), CanonicalError> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their UTF-8 bytes.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CanonicalError> {
    let mut pairs: Vec<(&str, &Value)> = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        match k {
            Value::Text(key) => pairs.push((key.as_str(), v)),
            _ => return Err(CanonicalError::NonTextKey),
        }
    }

    pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    for window in pairs.windows(2) {
        if window[0].0 == window[1].0 {
            return Err(CanonicalError::DuplicateKey(window[0].0.to_string()));
        }
    }

    encode_uint(buf, 5, pairs.len() as u64);
    for (key, value) in pairs {
        encode_text(buf, key);
        encode_value_to(buf, value)?;
    }
    Ok(())
}
