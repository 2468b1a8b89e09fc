/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Field units: the decodable elements of a template.
//!
//! A unit pairs a field's identity and presence with its operator and
//! wire type. Scalars decode in one read; decimals and sequences are
//! composites that decode through their component units.
//!
//! Every unit records its decoded value in the dictionary under the
//! field's name, null as an explicit empty slot, so later messages can
//! reference it through copy, increment, delta, and tail operators.

use crate::decimal::DecimalField;
use crate::sequence::SequenceField;
use bytes::Bytes;
use ferrofast_codec::{Cursor, PresenceMap, reader};
use ferrofast_core::{DecodeError, FieldProperties, Value};
use ferrofast_operator::{DictEntry, Dictionary, Operator};
use serde::{Deserialize, Serialize};

/// Wire type of a scalar unit, fixed by the [`FieldUnit`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarKind {
    UInt32,
    Int32,
    UInt64,
    Int64,
    Ascii,
    Unicode,
    ByteVector,
}

impl ScalarKind {
    /// The zero value of this type; tails and deltas run against it when
    /// the dictionary holds nothing.
    pub(crate) const fn base(self) -> Value {
        match self {
            Self::UInt32 => Value::UInt32(0),
            Self::Int32 => Value::Int32(0),
            Self::UInt64 => Value::UInt64(0),
            Self::Int64 => Value::Int64(0),
            Self::Ascii | Self::Unicode => Value::String(String::new()),
            Self::ByteVector => Value::Bytes(Bytes::new()),
        }
    }

    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::UInt32 => "uint32",
            Self::Int32 => "int32",
            Self::UInt64 => "uint64",
            Self::Int64 => "int64",
            Self::Ascii | Self::Unicode => "string",
            Self::ByteVector => "bytes",
        }
    }

    pub(crate) const fn is_integer(self) -> bool {
        matches!(self, Self::UInt32 | Self::Int32 | Self::UInt64 | Self::Int64)
    }

    fn read_plain(self, cursor: &mut Cursor<'_>, required: bool) -> Result<Value, DecodeError> {
        if required {
            match self {
                Self::UInt32 => reader::read_uint32(cursor).map(Value::UInt32),
                Self::Int32 => reader::read_int32(cursor).map(Value::Int32),
                Self::UInt64 => reader::read_uint64(cursor).map(Value::UInt64),
                Self::Int64 => reader::read_int64(cursor).map(Value::Int64),
                Self::Ascii => reader::read_string(cursor).map(Value::String),
                Self::Unicode => reader::read_unicode(cursor).map(Value::String),
                Self::ByteVector => reader::read_byte_vector(cursor).map(Value::Bytes),
            }
        } else {
            match self {
                Self::UInt32 => Ok(nullable(reader::read_optional_uint32(cursor)?, Value::UInt32)),
                Self::Int32 => Ok(nullable(reader::read_optional_int32(cursor)?, Value::Int32)),
                Self::UInt64 => Ok(nullable(reader::read_optional_uint64(cursor)?, Value::UInt64)),
                Self::Int64 => Ok(nullable(reader::read_optional_int64(cursor)?, Value::Int64)),
                Self::Ascii => Ok(nullable(reader::read_optional_string(cursor)?, Value::String)),
                Self::Unicode => Ok(nullable(reader::read_optional_unicode(cursor)?, Value::String)),
                Self::ByteVector => Ok(nullable(
                    reader::read_optional_byte_vector(cursor)?,
                    Value::Bytes,
                )),
            }
        }
    }
}

fn nullable<T>(value: Option<T>, wrap: fn(T) -> Value) -> Value {
    value.map_or(Value::Null, wrap)
}

/// A scalar field: identity, presence, and operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarField {
    /// Field identity and presence.
    pub properties: FieldProperties,
    /// Operator driving how the value is encoded.
    pub operator: Operator,
}

impl ScalarField {
    /// Creates a scalar field.
    #[must_use]
    pub fn new(properties: FieldProperties, operator: Operator) -> Self {
        Self {
            properties,
            operator,
        }
    }

    /// Returns true if this field consumes a presence-map bit.
    #[must_use]
    pub fn requires_pmap(&self) -> bool {
        self.operator.requires_pmap(self.properties.required)
    }

    pub(crate) fn deserialise(
        &self,
        kind: ScalarKind,
        cursor: &mut Cursor<'_>,
        pmap: &mut PresenceMap,
        dictionary: &mut Dictionary,
    ) -> Result<Value, DecodeError> {
        let required = self.properties.required;
        let name = self.properties.name.as_str();
        let value = if self.operator.should_read_value(pmap, required) {
            self.read_and_apply(kind, cursor, dictionary.get(name))
        } else {
            self.operator
                .not_encoded_value(required, dictionary.get(name))
        }
        .map_err(|err| err.in_field(self.properties.id, name, self.operator.name()))?;
        dictionary.set(name, &value);
        Ok(value)
    }

    fn read_and_apply(
        &self,
        kind: ScalarKind,
        cursor: &mut Cursor<'_>,
        previous: &DictEntry,
    ) -> Result<Value, DecodeError> {
        let base = kind.base();
        if matches!(self.operator, Operator::Delta(_)) {
            return self.read_delta(kind, cursor, previous, &base);
        }
        let value = if self.operator.reads_stream() {
            kind.read_plain(cursor, self.properties.required)?
        } else {
            Value::Null
        };
        self.operator.apply(value, previous, &base)
    }

    /// Deltas are never null-shifted as a whole: numeric differences ride
    /// the wide reader, string and byte differences a subtraction length
    /// followed by the difference in its mandatory form. Optionality
    /// lives in the first read only.
    fn read_delta(
        &self,
        kind: ScalarKind,
        cursor: &mut Cursor<'_>,
        previous: &DictEntry,
        base: &Value,
    ) -> Result<Value, DecodeError> {
        let required = self.properties.required;
        if kind.is_integer() {
            let delta = if required {
                Some(reader::read_big_int(cursor)?)
            } else {
                reader::read_optional_big_int(cursor)?
            };
            return match delta {
                Some(delta) => self.operator.apply_numeric_delta(delta, previous, base),
                None => Ok(Value::Null),
            };
        }

        let length = if required {
            Some(reader::read_int32(cursor)?)
        } else {
            reader::read_optional_int32(cursor)?
        };
        let Some(length) = length else {
            return Ok(Value::Null);
        };
        let diff = match kind {
            ScalarKind::Ascii => Value::String(reader::read_string(cursor)?),
            _ => Value::Bytes(reader::read_byte_vector(cursor)?),
        };
        self.operator.apply_splice(length, diff, previous, base)
    }
}

/// A decodable element of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldUnit {
    /// Unsigned 32-bit integer field.
    UInt32(ScalarField),
    /// Signed 32-bit integer field.
    Int32(ScalarField),
    /// Unsigned 64-bit integer field.
    UInt64(ScalarField),
    /// Signed 64-bit integer field.
    Int64(ScalarField),
    /// ASCII string field.
    Ascii(ScalarField),
    /// Unicode string field, length-prefixed UTF-8 on the wire.
    Unicode(ScalarField),
    /// Length-prefixed byte-vector field.
    ByteVector(ScalarField),
    /// Decimal field decoding through exponent and mantissa components.
    Decimal(DecimalField),
    /// Repeating group of inner units.
    Sequence(SequenceField),
}

impl FieldUnit {
    /// Returns the field id carried into decoded messages.
    #[must_use]
    pub fn tag_id(&self) -> u64 {
        self.properties().id
    }

    /// Returns the field's name, the key of its dictionary slot.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.properties().name
    }

    /// Returns the field's identity and presence.
    #[must_use]
    pub fn properties(&self) -> &FieldProperties {
        match self {
            Self::UInt32(field)
            | Self::Int32(field)
            | Self::UInt64(field)
            | Self::Int64(field)
            | Self::Ascii(field)
            | Self::Unicode(field)
            | Self::ByteVector(field) => &field.properties,
            Self::Decimal(field) => field.properties(),
            Self::Sequence(field) => field.properties(),
        }
    }

    /// Returns true if decoding this unit consumes bits of the current
    /// presence map.
    ///
    /// For sequences only the length field counts: inner units consume
    /// the per-entry maps, not the enclosing one.
    #[must_use]
    pub fn requires_pmap(&self) -> bool {
        match self {
            Self::UInt32(field)
            | Self::Int32(field)
            | Self::UInt64(field)
            | Self::Int64(field)
            | Self::Ascii(field)
            | Self::Unicode(field)
            | Self::ByteVector(field) => field.requires_pmap(),
            Self::Decimal(field) => field.requires_pmap(),
            Self::Sequence(field) => field.length().requires_pmap(),
        }
    }

    /// Decodes this unit against the stream, the current presence map,
    /// and the dictionary.
    ///
    /// # Errors
    ///
    /// Decode failures carry the offending field's id, name, and
    /// operator as context.
    pub fn deserialise(
        &self,
        cursor: &mut Cursor<'_>,
        pmap: &mut PresenceMap,
        dictionary: &mut Dictionary,
    ) -> Result<Value, DecodeError> {
        match self {
            Self::UInt32(field) => field.deserialise(ScalarKind::UInt32, cursor, pmap, dictionary),
            Self::Int32(field) => field.deserialise(ScalarKind::Int32, cursor, pmap, dictionary),
            Self::UInt64(field) => field.deserialise(ScalarKind::UInt64, cursor, pmap, dictionary),
            Self::Int64(field) => field.deserialise(ScalarKind::Int64, cursor, pmap, dictionary),
            Self::Ascii(field) => field.deserialise(ScalarKind::Ascii, cursor, pmap, dictionary),
            Self::Unicode(field) => field.deserialise(ScalarKind::Unicode, cursor, pmap, dictionary),
            Self::ByteVector(field) => {
                field.deserialise(ScalarKind::ByteVector, cursor, pmap, dictionary)
            }
            Self::Decimal(field) => field.deserialise(cursor, pmap, dictionary),
            Self::Sequence(field) => field.deserialise(cursor, pmap, dictionary),
        }
    }
}
