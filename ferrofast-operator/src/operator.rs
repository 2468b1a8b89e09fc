/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! FAST field operators.
//!
//! Operators define how a field's value relates to the stream, the
//! presence map, and the prior value held in the dictionary:
//!
//! - **None**: value is always read from the stream
//! - **Constant**: value never occupies the stream
//! - **Default**: map bit selects between the stream and the initial value
//! - **Copy**: map bit selects between the stream and the prior value
//! - **Increment**: as copy, but an absent value means prior plus one
//! - **Delta**: stream carries a difference against the prior value
//! - **Tail**: stream carries a replacement for the end of the prior value
//!
//! The decode flow asks three questions per field: does the operator
//! consume a presence-map bit, does it read the stream, and what value
//! results. Delta differences arrive through [`Operator::apply_numeric_delta`]
//! and [`Operator::apply_splice`]; every other read goes through
//! [`Operator::apply`].

use crate::dictionary::DictEntry;
use bytes::Bytes;
use ferrofast_codec::PresenceMap;
use ferrofast_core::{DecodeError, Value};
use num_traits::{CheckedAdd, One};
use serde::{Deserialize, Serialize};

/// FAST field operator with its initial value, where the operator takes one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Operator {
    /// No operator - value is always present in the stream.
    #[default]
    None,
    /// Constant - value is never in the stream.
    Constant(Value),
    /// Default - if absent, use the initial value.
    Default(Option<Value>),
    /// Copy - if absent, use the previous value from the dictionary.
    Copy(Option<Value>),
    /// Increment - if absent, increment the previous value by 1.
    Increment(Option<Value>),
    /// Delta - stream value is a difference from the previous value.
    Delta(Option<Value>),
    /// Tail - stream value replaces the tail of the previous value.
    Tail(Option<Value>),
}

impl Operator {
    /// Returns the operator's label, as used in error context.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Constant(_) => "constant",
            Self::Default(_) => "default",
            Self::Copy(_) => "copy",
            Self::Increment(_) => "increment",
            Self::Delta(_) => "delta",
            Self::Tail(_) => "tail",
        }
    }

    /// Returns the initial value carried by the operator, if any.
    #[must_use]
    pub const fn initial_value(&self) -> Option<&Value> {
        match self {
            Self::None => None,
            Self::Constant(value) => Some(value),
            Self::Default(initial)
            | Self::Copy(initial)
            | Self::Increment(initial)
            | Self::Delta(initial)
            | Self::Tail(initial) => initial.as_ref(),
        }
    }

    /// Returns true if the operator consumes a presence-map bit on a field
    /// of the given presence.
    ///
    /// Constants are the asymmetric case: a required constant needs no
    /// bit because the value is fixed, while an optional constant uses
    /// the bit to choose between the constant and null.
    #[must_use]
    pub const fn requires_pmap(&self, required: bool) -> bool {
        match self {
            Self::None | Self::Delta(_) => false,
            Self::Constant(_) => !required,
            Self::Default(_) | Self::Copy(_) | Self::Increment(_) | Self::Tail(_) => true,
        }
    }

    /// Consults the presence map and reports whether a value was encoded
    /// for this field.
    ///
    /// The map position advances only when the operator actually uses a
    /// bit; fields without one always read the stream.
    pub fn should_read_value(&self, pmap: &mut PresenceMap, required: bool) -> bool {
        if self.requires_pmap(required) {
            pmap.next_bit()
        } else {
            !matches!(self, Self::Constant(_))
        }
    }

    /// Returns true if an encoded value occupies stream bytes.
    ///
    /// Only constants answer no: their value travels in the template.
    #[must_use]
    pub const fn reads_stream(&self) -> bool {
        !matches!(self, Self::Constant(_))
    }

    /// Produces the field's value when no value was encoded for it.
    ///
    /// Operators that always read the stream never take this path.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MissingInitial`] when a required field has neither
    /// a usable prior nor an initial value,
    /// [`DecodeError::OperatorOverflow`] when an increment leaves the
    /// field's width.
    pub fn not_encoded_value(
        &self,
        required: bool,
        previous: &DictEntry,
    ) -> Result<Value, DecodeError> {
        match self {
            Self::None | Self::Delta(_) => Ok(Value::Null),
            Self::Constant(value) => Ok(if required { value.clone() } else { Value::Null }),
            Self::Default(initial) => initial_or_absent(initial, required),
            Self::Copy(initial) => match previous {
                DictEntry::Assigned(value) => Ok(value.clone()),
                DictEntry::Undefined => initial_or_absent(initial, required),
                DictEntry::Empty if required => Err(DecodeError::MissingInitial),
                DictEntry::Empty => Ok(Value::Null),
            },
            Self::Increment(initial) => match previous {
                DictEntry::Assigned(value) => incremented(value),
                DictEntry::Undefined => initial_or_absent(initial, required),
                DictEntry::Empty if required => Err(DecodeError::MissingInitial),
                DictEntry::Empty => Ok(Value::Null),
            },
            Self::Tail(initial) => match previous {
                DictEntry::Assigned(value) => Ok(value.clone()),
                DictEntry::Undefined | DictEntry::Empty => initial_or_absent(initial, required),
            },
        }
    }

    /// Produces the field's value from a value read off the stream.
    ///
    /// `base` is the zero value of the field's type; it anchors tail
    /// replacement when the dictionary has no prior. Constants ignore
    /// `value` entirely, tails splice it onto the prior, and every other
    /// operator passes it through.
    ///
    /// # Errors
    ///
    /// [`DecodeError::NullPrevious`] when a tail lands on an explicitly
    /// null prior, [`DecodeError::PreviousTypeMismatch`] when the prior's
    /// type does not match the field.
    pub fn apply(
        &self,
        value: Value,
        previous: &DictEntry,
        base: &Value,
    ) -> Result<Value, DecodeError> {
        match self {
            Self::Constant(constant) => Ok(constant.clone()),
            Self::Tail(_) => self.apply_tail(value, previous, base),
            _ => Ok(value),
        }
    }

    /// Adds a numeric difference to the prior value.
    ///
    /// The sum runs in 128-bit space and is then narrowed back to the
    /// width named by `base`, so intermediate arithmetic cannot wrap.
    ///
    /// # Errors
    ///
    /// [`DecodeError::NullPrevious`] when the prior is explicitly null,
    /// [`DecodeError::OperatorOverflow`] when the sum leaves the field's
    /// width.
    pub fn apply_numeric_delta(
        &self,
        delta: i128,
        previous: &DictEntry,
        base: &Value,
    ) -> Result<Value, DecodeError> {
        let prior = self.resolve_prior(previous, base)?;
        let prior_int = prior
            .as_integer()
            .ok_or_else(|| DecodeError::PreviousTypeMismatch {
                expected: base.type_label(),
                found: prior.type_label(),
            })?;
        let overflow = DecodeError::OperatorOverflow {
            delta,
            previous: prior_int,
            width: base.type_label(),
        };
        let sum = prior_int.checked_add(delta).ok_or_else(|| overflow.clone())?;
        narrow_sum(base, sum).ok_or(overflow)
    }

    /// Splices a string or byte-vector difference onto the prior value.
    ///
    /// A non-negative `length` removes that many bytes from the end of
    /// the prior before appending `diff`; a negative `length` removes
    /// `-length - 1` bytes from the front and prepends `diff`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::SpliceOutOfRange`] when the removal count exceeds
    /// the prior's length, [`DecodeError::NullPrevious`] when the prior
    /// is explicitly null.
    pub fn apply_splice(
        &self,
        length: i32,
        diff: Value,
        previous: &DictEntry,
        base: &Value,
    ) -> Result<Value, DecodeError> {
        let prior = self.resolve_prior(previous, base)?;
        match (&prior, &diff) {
            (Value::String(prior_str), Value::String(diff_str)) => {
                utf8_value(splice(prior_str.as_bytes(), length, diff_str.as_bytes())?)
            }
            (Value::String(prior_str), Value::Bytes(diff_bytes)) => {
                utf8_value(splice(prior_str.as_bytes(), length, diff_bytes)?)
            }
            (Value::Bytes(prior_bytes), Value::Bytes(diff_bytes)) => Ok(Value::Bytes(Bytes::from(
                splice(prior_bytes, length, diff_bytes)?,
            ))),
            _ => Err(DecodeError::PreviousTypeMismatch {
                expected: base.type_label(),
                found: prior.type_label(),
            }),
        }
    }

    fn apply_tail(
        &self,
        value: Value,
        previous: &DictEntry,
        base: &Value,
    ) -> Result<Value, DecodeError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let prior = self.resolve_prior(previous, base)?;
        match (&prior, &value) {
            (Value::String(prior_str), Value::String(diff)) => {
                utf8_value(replace_tail(prior_str.as_bytes(), diff.as_bytes()))
            }
            (Value::Bytes(prior_bytes), Value::Bytes(diff)) => {
                Ok(Value::Bytes(Bytes::from(replace_tail(prior_bytes, diff))))
            }
            _ => Err(DecodeError::PreviousTypeMismatch {
                expected: base.type_label(),
                found: prior.type_label(),
            }),
        }
    }

    /// The value a delta or tail runs against: the prior if assigned, the
    /// initial value if the slot was never written, `base` as a last
    /// resort. An explicitly null prior has nothing to run against.
    fn resolve_prior(&self, previous: &DictEntry, base: &Value) -> Result<Value, DecodeError> {
        match previous {
            DictEntry::Assigned(value) => Ok(value.clone()),
            DictEntry::Undefined => Ok(self.initial_value().unwrap_or(base).clone()),
            DictEntry::Empty => Err(DecodeError::NullPrevious),
        }
    }
}

fn initial_or_absent(initial: &Option<Value>, required: bool) -> Result<Value, DecodeError> {
    match initial {
        Some(value) => Ok(value.clone()),
        None if required => Err(DecodeError::MissingInitial),
        None => Ok(Value::Null),
    }
}

fn checked_increment<T: CheckedAdd + One>(value: &T) -> Option<T> {
    value.checked_add(&T::one())
}

const fn increment_overflow(previous: i128, width: &'static str) -> DecodeError {
    DecodeError::OperatorOverflow {
        delta: 1,
        previous,
        width,
    }
}

fn incremented(value: &Value) -> Result<Value, DecodeError> {
    match value {
        Value::UInt32(n) => checked_increment(n)
            .map(Value::UInt32)
            .ok_or_else(|| increment_overflow(i128::from(*n), "uint32")),
        Value::Int32(n) => checked_increment(n)
            .map(Value::Int32)
            .ok_or_else(|| increment_overflow(i128::from(*n), "int32")),
        Value::UInt64(n) => checked_increment(n)
            .map(Value::UInt64)
            .ok_or_else(|| increment_overflow(i128::from(*n), "uint64")),
        Value::Int64(n) => checked_increment(n)
            .map(Value::Int64)
            .ok_or_else(|| increment_overflow(i128::from(*n), "int64")),
        Value::BigInt(n) => checked_increment(n)
            .map(Value::BigInt)
            .ok_or_else(|| increment_overflow(*n, "bigint")),
        other => Err(DecodeError::PreviousTypeMismatch {
            expected: "integer",
            found: other.type_label(),
        }),
    }
}

fn narrow_sum(base: &Value, sum: i128) -> Option<Value> {
    match base {
        Value::UInt32(_) => u32::try_from(sum).ok().map(Value::UInt32),
        Value::Int32(_) => i32::try_from(sum).ok().map(Value::Int32),
        Value::UInt64(_) => u64::try_from(sum).ok().map(Value::UInt64),
        Value::Int64(_) => i64::try_from(sum).ok().map(Value::Int64),
        Value::BigInt(_) => Some(Value::BigInt(sum)),
        _ => None,
    }
}

fn utf8_value(bytes: Vec<u8>) -> Result<Value, DecodeError> {
    String::from_utf8(bytes)
        .map(Value::String)
        .map_err(|err| DecodeError::InvalidUnicode(err.utf8_error()))
}

fn replace_tail(base: &[u8], diff: &[u8]) -> Vec<u8> {
    let keep = base.len().saturating_sub(diff.len());
    let mut out = Vec::with_capacity(keep + diff.len());
    out.extend_from_slice(&base[..keep]);
    out.extend_from_slice(diff);
    out
}

fn splice(base: &[u8], length: i32, diff: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if length >= 0 {
        let count = length as usize;
        if count > base.len() {
            return Err(DecodeError::SpliceOutOfRange {
                count,
                base_length: base.len(),
            });
        }
        let keep = base.len() - count;
        let mut out = Vec::with_capacity(keep + diff.len());
        out.extend_from_slice(&base[..keep]);
        out.extend_from_slice(diff);
        Ok(out)
    } else {
        let count = (-i64::from(length) - 1) as usize;
        if count > base.len() {
            return Err(DecodeError::SpliceOutOfRange {
                count,
                base_length: base.len(),
            });
        }
        let mut out = Vec::with_capacity(diff.len() + base.len() - count);
        out.extend_from_slice(diff);
        out.extend_from_slice(&base[count..]);
        Ok(out)
    }
}
