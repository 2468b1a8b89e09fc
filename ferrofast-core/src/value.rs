/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Decoded value model for the FerroFAST engine.
//!
//! Every field emission of the decoder is exactly one [`Value`]. Null is a
//! first-class value, distinct from an empty string or an empty byte vector;
//! stateful operators depend on that distinction. Decimals preserve the
//! exact exponent/mantissa pair from the wire and convert to
//! [`rust_decimal::Decimal`] on demand.

use crate::message::Message;
use bytes::Bytes;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single decoded FAST value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Explicit null (absent optional value).
    #[default]
    Null,
    /// ASCII or Unicode string.
    String(String),
    /// Raw byte vector.
    Bytes(Bytes),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Wide integer produced by the 10-byte stop-bit reader.
    BigInt(i128),
    /// Exact decimal as an exponent/mantissa pair: `mantissa * 10^exponent`.
    Decimal {
        /// Power-of-ten exponent.
        exponent: i32,
        /// Signed mantissa.
        mantissa: i64,
    },
    /// Repeating group: an ordered list of sub-messages.
    Sequence(Vec<Message>),
}

impl Value {
    /// Builds a decimal value from its exponent and mantissa.
    #[must_use]
    pub const fn decimal(exponent: i32, mantissa: i64) -> Self {
        Self::Decimal { exponent, mantissa }
    }

    /// Returns `true` if this value is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string content if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the raw bytes if this is a byte-vector value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as `u32` if it is an unsigned 32-bit integer.
    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `i32` if it is a signed 32-bit integer.
    #[must_use]
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `u64` if it is an unsigned 64-bit integer.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is a signed 64-bit integer.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `i128` if it is a wide integer.
    #[must_use]
    pub const fn as_big_int(&self) -> Option<i128> {
        match self {
            Self::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the `(exponent, mantissa)` pair if this is a decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<(i32, i64)> {
        match self {
            Self::Decimal { exponent, mantissa } => Some((*exponent, *mantissa)),
            _ => None,
        }
    }

    /// Returns the sub-messages if this is a sequence value.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Message]> {
        match self {
            Self::Sequence(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns any integer variant widened to `i128`.
    ///
    /// Covers `UInt32`, `Int32`, `UInt64`, `Int64`, and `BigInt`; other
    /// variants yield `None`.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i128> {
        match self {
            Self::UInt32(v) => Some(*v as i128),
            Self::Int32(v) => Some(*v as i128),
            Self::UInt64(v) => Some(*v as i128),
            Self::Int64(v) => Some(*v as i128),
            Self::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts a decimal value to a [`rust_decimal::Decimal`].
    ///
    /// # Returns
    ///
    /// `None` if this is not a decimal value or if the magnitude does not
    /// fit `rust_decimal`'s 96-bit representation.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        let Self::Decimal { exponent, mantissa } = self else {
            return None;
        };
        if *exponent <= 0 {
            let scale = u32::try_from(-i64::from(*exponent)).ok()?;
            Decimal::try_from_i128_with_scale(i128::from(*mantissa), scale).ok()
        } else {
            let mut result = Decimal::from(*mantissa);
            for _ in 0..*exponent {
                result = result.checked_mul(Decimal::TEN)?;
            }
            Some(result)
        }
    }

    /// Stable lowercase label for this value's type, used in error text.
    #[must_use]
    pub const fn type_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::UInt32(_) => "uint32",
            Self::Int32(_) => "int32",
            Self::UInt64(_) => "uint64",
            Self::Int64(_) => "int64",
            Self::BigInt(_) => "bigint",
            Self::Decimal { .. } => "decimal",
            Self::Sequence(_) => "sequence",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Decimal { exponent, mantissa } => write!(f, "{mantissa}e{exponent}"),
            Self::Sequence(entries) => write!(f, "<sequence of {}>", entries.len()),
        }
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::UInt32(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<i128> for Value {
    fn from(v: i128) -> Self {
        Self::BigInt(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_distinct_from_empty() {
        assert!(Value::Null.is_null());
        assert!(!Value::String(String::new()).is_null());
        assert!(!Value::Bytes(Bytes::new()).is_null());
    }

    #[test]
    fn test_accessors_match_variants() {
        assert_eq!(Value::UInt32(7).as_u32(), Some(7));
        assert_eq!(Value::Int32(-7).as_i32(), Some(-7));
        assert_eq!(Value::UInt64(7).as_u64(), Some(7));
        assert_eq!(Value::Int64(-7).as_i64(), Some(-7));
        assert_eq!(Value::BigInt(1 << 100).as_big_int(), Some(1 << 100));
        assert_eq!(Value::from("abc").as_str(), Some("abc"));
        assert_eq!(Value::UInt32(7).as_i32(), None);
    }

    #[test]
    fn test_as_integer_widens_all_widths() {
        assert_eq!(Value::UInt32(u32::MAX).as_integer(), Some(i128::from(u32::MAX)));
        assert_eq!(Value::Int64(i64::MIN).as_integer(), Some(i128::from(i64::MIN)));
        assert_eq!(Value::UInt64(u64::MAX).as_integer(), Some(i128::from(u64::MAX)));
        assert_eq!(Value::Null.as_integer(), None);
        assert_eq!(Value::from("1").as_integer(), None);
    }

    #[test]
    fn test_to_decimal_negative_exponent() {
        let value = Value::decimal(-2, 1150);
        assert_eq!(value.to_decimal(), Some(Decimal::new(1150, 2)));
    }

    #[test]
    fn test_to_decimal_positive_exponent() {
        let value = Value::decimal(3, 5);
        assert_eq!(value.to_decimal(), Some(Decimal::from(5000)));
    }

    #[test]
    fn test_to_decimal_non_decimal() {
        assert_eq!(Value::UInt32(5).to_decimal(), None);
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(Value::UInt32(0).type_label(), "uint32");
        assert_eq!(Value::Int64(0).type_label(), "int64");
        assert_eq!(Value::decimal(0, 0).type_label(), "decimal");
        assert_eq!(Value::Sequence(Vec::new()).type_label(), "sequence");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("EUR/USD").to_string(), "EUR/USD");
        assert_eq!(Value::decimal(-2, 1150).to_string(), "1150e-2");
        assert_eq!(Value::from(vec![1u8, 2, 3]).to_string(), "<3 bytes>");
    }

    #[test]
    fn test_default_is_null() {
        assert_eq!(Value::default(), Value::Null);
    }
}
