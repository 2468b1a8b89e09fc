/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Decimal fields.
//!
//! A decimal travels as two integers: a signed 32-bit exponent followed
//! by a signed 64-bit mantissa, each with its own operator and its own
//! dictionary slot. The composite itself never touches the dictionary;
//! state lives entirely in the components.

use crate::unit::{ScalarField, ScalarKind};
use ferrofast_codec::{Cursor, PresenceMap};
use ferrofast_core::{DecodeError, FieldProperties, Value};
use ferrofast_operator::{Dictionary, Operator};
use serde::{Deserialize, Serialize};

/// A decimal field decoding through exponent and mantissa components.
///
/// The exponent inherits the field's presence; the mantissa is always
/// mandatory. When an optional decimal's exponent decodes to null the
/// whole field is null and the mantissa is not decoded at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimalField {
    properties: FieldProperties,
    exponent: ScalarField,
    mantissa: ScalarField,
}

impl DecimalField {
    /// Creates a decimal field from its component operators.
    ///
    /// Component dictionary slots are keyed by the field name with
    /// `.exponent` and `.mantissa` suffixes.
    #[must_use]
    pub fn new(
        properties: FieldProperties,
        exponent_operator: Operator,
        mantissa_operator: Operator,
    ) -> Self {
        let exponent = ScalarField::new(properties.with_suffix("exponent"), exponent_operator);
        let mut mantissa_properties = properties.with_suffix("mantissa");
        mantissa_properties.required = true;
        let mantissa = ScalarField::new(mantissa_properties, mantissa_operator);
        Self {
            properties,
            exponent,
            mantissa,
        }
    }

    /// Returns the field's identity and presence.
    #[must_use]
    pub fn properties(&self) -> &FieldProperties {
        &self.properties
    }

    /// Returns the exponent component.
    #[must_use]
    pub fn exponent(&self) -> &ScalarField {
        &self.exponent
    }

    /// Returns the mantissa component.
    #[must_use]
    pub fn mantissa(&self) -> &ScalarField {
        &self.mantissa
    }

    /// Returns true if either component consumes a presence-map bit.
    #[must_use]
    pub fn requires_pmap(&self) -> bool {
        self.exponent.requires_pmap() || self.mantissa.requires_pmap()
    }

    pub(crate) fn deserialise(
        &self,
        cursor: &mut Cursor<'_>,
        pmap: &mut PresenceMap,
        dictionary: &mut Dictionary,
    ) -> Result<Value, DecodeError> {
        let exponent = self
            .exponent
            .deserialise(ScalarKind::Int32, cursor, pmap, dictionary)?;
        let Some(exponent) = exponent.as_i32() else {
            return Ok(Value::Null);
        };
        let mantissa = self
            .mantissa
            .deserialise(ScalarKind::Int64, cursor, pmap, dictionary)?;
        let Some(mantissa) = mantissa.as_i64() else {
            return Err(DecodeError::DecimalExponentOnly.in_field(
                self.properties.id,
                &self.properties.name,
                self.mantissa.operator.name(),
            ));
        };
        Ok(Value::decimal(exponent, mantissa))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrofast_operator::DictEntry;

    fn decode(
        field: &DecimalField,
        bytes: &[u8],
        pmap_bits: &[bool],
        dictionary: &mut Dictionary,
    ) -> Result<Value, DecodeError> {
        let mut cursor = Cursor::new(bytes);
        let mut pmap = PresenceMap::from_bits(pmap_bits);
        field.deserialise(&mut cursor, &mut pmap, dictionary)
    }

    #[test]
    fn test_plain_decimal() {
        let field = DecimalField::new(
            FieldProperties::required(270, "MDEntryPx"),
            Operator::None,
            Operator::None,
        );
        let mut dictionary = Dictionary::new();
        // exponent -2, mantissa 942: 9.42
        let value = decode(&field, &[0xFE, 0x07, 0xAE], &[], &mut dictionary);
        assert_eq!(value, Ok(Value::decimal(-2, 942)));
    }

    #[test]
    fn test_components_write_their_own_slots() {
        let field = DecimalField::new(
            FieldProperties::required(270, "MDEntryPx"),
            Operator::None,
            Operator::None,
        );
        let mut dictionary = Dictionary::new();
        decode(&field, &[0xFE, 0x07, 0xAE], &[], &mut dictionary).ok();
        assert_eq!(
            dictionary.get("MDEntryPx.exponent"),
            &DictEntry::Assigned(Value::Int32(-2))
        );
        assert_eq!(
            dictionary.get("MDEntryPx.mantissa"),
            &DictEntry::Assigned(Value::Int64(942))
        );
        assert!(dictionary.get("MDEntryPx").is_undefined());
    }

    #[test]
    fn test_optional_decimal_null_exponent_skips_mantissa() {
        let field = DecimalField::new(
            FieldProperties::optional(270, "MDEntryPx"),
            Operator::None,
            Operator::None,
        );
        let mut dictionary = Dictionary::new();
        let mut cursor = Cursor::new(&[0x80, 0x07, 0xAE]);
        let mut pmap = PresenceMap::new();
        let value = field.deserialise(&mut cursor, &mut pmap, &mut dictionary);
        assert_eq!(value, Ok(Value::Null));
        // only the exponent byte was consumed
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_optional_decimal_with_value() {
        let field = DecimalField::new(
            FieldProperties::optional(270, "MDEntryPx"),
            Operator::None,
            Operator::None,
        );
        let mut dictionary = Dictionary::new();
        // optional exponent: negative wire values pass through, so -2 is 0xFE
        let value = decode(&field, &[0xFE, 0x07, 0xAE], &[], &mut dictionary);
        assert_eq!(value, Ok(Value::decimal(-2, 942)));
    }

    #[test]
    fn test_decimal_with_copy_components() {
        let field = DecimalField::new(
            FieldProperties::required(270, "MDEntryPx"),
            Operator::Copy(None),
            Operator::Copy(None),
        );
        let mut dictionary = Dictionary::new();
        let first = decode(&field, &[0xFE, 0x07, 0xAE], &[true, true], &mut dictionary);
        assert_eq!(first, Ok(Value::decimal(-2, 942)));

        // both bits clear: the whole decimal comes from the dictionary
        let second = decode(&field, &[], &[false, false], &mut dictionary);
        assert_eq!(second, Ok(Value::decimal(-2, 942)));

        // mantissa moves, exponent copies
        let third = decode(&field, &[0x07, 0xB3], &[false, true], &mut dictionary);
        assert_eq!(third, Ok(Value::decimal(-2, 947)));
    }

    #[test]
    fn test_null_mantissa_after_exponent_is_an_error() {
        let field = DecimalField::new(
            FieldProperties::required(270, "MDEntryPx"),
            Operator::None,
            Operator::Default(Some(Value::Null)),
        );
        let mut dictionary = Dictionary::new();
        let err = decode(&field, &[0xFE], &[false], &mut dictionary).unwrap_err();
        assert_eq!(*err.root_cause(), DecodeError::DecimalExponentOnly);
        assert_eq!(
            err.to_string(),
            "field MDEntryPx (id 270, default operator): decimal mantissa missing after a non-null exponent"
        );
    }
}
