//! Cache values and conversions from raw stored bytes.
//!
//! Key-value stores keep opaque bytes. [`CacheValue`] is what callers hand to
//! [`Cache::store`](crate::cache::Cache::store); the conversion functions turn the raw
//! bytes read back into a concrete type.

use std::{ascii, fmt};

use crate::error::StoreResult;

/// A value that can be stored in the cache.
///
/// `Debug` renders the bare value as a call argument: text quoted, bytes as a byte
/// string literal, numbers as written.
#[derive(Clone, PartialEq)]
pub enum CacheValue {
    Text(String),
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
}

impl CacheValue {
    /// Encodes the value the way Redis clients do.
    ///
    /// Text is written as UTF-8 and bytes as-is. Numbers are written as decimal text, so an
    /// integer can later be incremented by the store and read back with [`to_integer`].
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            CacheValue::Text(text) => text.as_bytes().to_vec(),
            CacheValue::Bytes(bytes) => bytes.clone(),
            CacheValue::Integer(value) => value.to_string().into_bytes(),
            // Debug keeps a trailing ".0" on whole floats
            CacheValue::Float(value) => format!("{:?}", value).into_bytes(),
        }
    }
}

impl fmt::Debug for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValue::Text(text) => write!(f, "{:?}", text),
            CacheValue::Bytes(bytes) => {
                f.write_str("b\"")?;
                for byte in bytes {
                    write!(f, "{}", ascii::escape_default(*byte))?;
                }
                f.write_str("\"")
            }
            CacheValue::Integer(value) => write!(f, "{}", value),
            CacheValue::Float(value) => write!(f, "{:?}", value),
        }
    }
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValue::Text(text) => f.write_str(text),
            CacheValue::Bytes(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            CacheValue::Integer(value) => write!(f, "{}", value),
            CacheValue::Float(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        CacheValue::Text(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        CacheValue::Text(value)
    }
}

impl From<&[u8]> for CacheValue {
    fn from(value: &[u8]) -> Self {
        CacheValue::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(value: Vec<u8>) -> Self {
        CacheValue::Bytes(value)
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        CacheValue::Integer(value)
    }
}

impl From<i32> for CacheValue {
    fn from(value: i32) -> Self {
        CacheValue::Integer(value.into())
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        CacheValue::Float(value)
    }
}

/// Returns the raw bytes unchanged.
pub fn to_bytes(raw: Vec<u8>) -> StoreResult<Vec<u8>> {
    Ok(raw)
}

/// Decodes the raw bytes as UTF-8 text.
pub fn to_text(raw: Vec<u8>) -> StoreResult<String> {
    Ok(String::from_utf8(raw)?)
}

/// Parses the raw bytes as a decimal integer.
pub fn to_integer(raw: Vec<u8>) -> StoreResult<i64> {
    Ok(to_text(raw)?.trim().parse::<i64>()?)
}

/// Parses the raw bytes as a floating-point number.
pub fn to_float(raw: Vec<u8>) -> StoreResult<f64> {
    Ok(to_text(raw)?.trim().parse::<f64>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_integer_encoding_is_decimal_text() {
        assert_eq!(CacheValue::from(-42).to_bytes(), b"-42".to_vec());
        assert_eq!(to_integer(CacheValue::from(-42).to_bytes()).unwrap(), -42);
    }

    #[test]
    fn test_float_encoding_keeps_fraction() {
        assert_eq!(CacheValue::from(1.0).to_bytes(), b"1.0".to_vec());
        assert_eq!(to_float(CacheValue::from(3.25).to_bytes()).unwrap(), 3.25);
    }

    #[test]
    fn test_bytes_are_untouched() {
        let raw: Vec<u8> = (0..=255).collect();
        assert_eq!(CacheValue::from(raw.clone()).to_bytes(), raw);
    }

    #[test]
    fn test_debug_renders_bare_argument() {
        assert_eq!(format!("{:?}", (CacheValue::from("foo"),)), "(\"foo\",)");
        assert_eq!(format!("{:?}", CacheValue::from(b"ba\"r\x00".as_slice())), "b\"ba\\\"r\\x00\"");
        assert_eq!(format!("{:?}", CacheValue::from(42)), "42");
        assert_eq!(format!("{:?}", CacheValue::from(2.0)), "2.0");
    }

    #[test]
    fn test_to_integer_rejects_text() {
        assert!(matches!(to_integer(b"foo".to_vec()), Err(StoreError::Conversion(_))));
    }

    #[test]
    fn test_to_text_rejects_invalid_utf8() {
        assert!(matches!(to_text(vec![0xc3, 0x28]), Err(StoreError::Conversion(_))));
    }
}
