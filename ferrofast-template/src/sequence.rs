/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Sequence fields: repeating groups of inner units.
//!
//! A sequence decodes a length field against the enclosing presence map,
//! then that many entries. Each entry carries its own presence map when
//! any inner unit needs one; entries of operator-free units carry none.
//! Dictionary slots are shared across entries, so copy and delta chains
//! run from one entry into the next.

use crate::unit::{FieldUnit, ScalarField, ScalarKind};
use ferrofast_codec::{Cursor, PresenceMap};
use ferrofast_core::{DecodeError, FieldProperties, Message, Value};
use ferrofast_operator::{Dictionary, Operator};
use serde::{Deserialize, Serialize};

/// A repeating group field.
///
/// The length travels as an unsigned 32-bit integer with its own
/// operator; its dictionary slot is keyed by the field name with a
/// `.length` suffix. A null length makes the whole sequence null. The
/// length never appears in the decoded message, only the entries do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceField {
    properties: FieldProperties,
    length: ScalarField,
    fields: Vec<FieldUnit>,
}

impl SequenceField {
    /// Creates a sequence field from its length operator and inner units.
    #[must_use]
    pub fn new(
        properties: FieldProperties,
        length_operator: Operator,
        fields: Vec<FieldUnit>,
    ) -> Self {
        let length = ScalarField::new(properties.with_suffix("length"), length_operator);
        Self {
            properties,
            length,
            fields,
        }
    }

    /// Returns the field's identity and presence.
    #[must_use]
    pub fn properties(&self) -> &FieldProperties {
        &self.properties
    }

    /// Returns the length component.
    #[must_use]
    pub fn length(&self) -> &ScalarField {
        &self.length
    }

    /// Returns the inner units decoded for every entry.
    #[must_use]
    pub fn fields(&self) -> &[FieldUnit] {
        &self.fields
    }

    /// Returns true if entries carry their own presence map.
    #[must_use]
    pub fn entry_requires_pmap(&self) -> bool {
        self.fields.iter().any(FieldUnit::requires_pmap)
    }

    pub(crate) fn deserialise(
        &self,
        cursor: &mut Cursor<'_>,
        pmap: &mut PresenceMap,
        dictionary: &mut Dictionary,
    ) -> Result<Value, DecodeError> {
        let length = self
            .length
            .deserialise(ScalarKind::UInt32, cursor, pmap, dictionary)?;
        let Some(count) = length.as_u32() else {
            return Ok(Value::Null);
        };
        let needs_pmap = self.entry_requires_pmap();
        let mut entries = Vec::new();
        for _ in 0..count {
            let mut entry_pmap = if needs_pmap {
                PresenceMap::decode(cursor).map_err(|err| {
                    err.in_field(
                        self.properties.id,
                        &self.properties.name,
                        self.length.operator.name(),
                    )
                })?
            } else {
                PresenceMap::new()
            };
            let mut entry = Message::with_capacity(self.fields.len());
            for unit in &self.fields {
                let value = unit.deserialise(cursor, &mut entry_pmap, dictionary)?;
                entry.insert(unit.tag_id(), value);
            }
            entries.push(entry);
        }
        Ok(Value::Sequence(entries))
    }
}
