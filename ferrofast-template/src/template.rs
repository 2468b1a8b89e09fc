/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Templates and the template store.
//!
//! A template is an ordered list of field units under a numeric id; the
//! store maps ids to templates so the decoder can route each message by
//! the id carried in its header.

use crate::unit::FieldUnit;
use ferrofast_codec::{Cursor, PresenceMap};
use ferrofast_core::{DecodeError, Message};
use ferrofast_operator::Dictionary;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An ordered field layout under a template id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    id: u32,
    name: String,
    units: Vec<FieldUnit>,
}

impl Template {
    /// Creates a template.
    ///
    /// [`crate::builder::TemplateBuilder`] additionally checks the static
    /// operator and id rules before producing one.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, units: Vec<FieldUnit>) -> Self {
        Self {
            id,
            name: name.into(),
            units,
        }
    }

    /// Returns the template id.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the template's field units in decode order.
    #[must_use]
    pub fn units(&self) -> &[FieldUnit] {
        &self.units
    }

    /// Decodes one message body against the message's presence map.
    ///
    /// The map arrives with the template-id bit already consumed; units
    /// take their bits from the same map in field order. Every field
    /// lands in the message, nulls included.
    ///
    /// # Errors
    ///
    /// Forwards field decode failures, each carrying its field context.
    pub fn deserialise(
        &self,
        cursor: &mut Cursor<'_>,
        pmap: &mut PresenceMap,
        dictionary: &mut Dictionary,
    ) -> Result<Message, DecodeError> {
        let mut message = Message::with_capacity(self.units.len());
        for unit in &self.units {
            let value = unit.deserialise(cursor, pmap, dictionary)?;
            message.insert(unit.tag_id(), value);
        }
        Ok(message)
    }
}

/// Templates indexed by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<u32, Template>,
}

impl TemplateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template under its id, returning the template it
    /// replaced, if any.
    pub fn register(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.id(), template)
    }

    /// Returns the template registered under `id`.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Template> {
        self.templates.get(&id)
    }

    /// Returns the number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if no template is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterates over registered template ids in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.templates.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::ScalarField;
    use ferrofast_core::{FieldProperties, Value};
    use ferrofast_operator::Operator;

    fn heartbeat() -> Template {
        Template::new(
            1,
            "Heartbeat",
            vec![
                FieldUnit::Ascii(ScalarField::new(
                    FieldProperties::required(35, "MsgType"),
                    Operator::Constant(Value::String("0".to_string())),
                )),
                FieldUnit::UInt32(ScalarField::new(
                    FieldProperties::required(34, "MsgSeqNum"),
                    Operator::None,
                )),
            ],
        )
    }

    #[test]
    fn test_template_deserialise_in_field_order() {
        let template = heartbeat();
        let mut cursor = Cursor::new(&[0x85]);
        let mut pmap = PresenceMap::new();
        let mut dictionary = Dictionary::new();
        let message = template
            .deserialise(&mut cursor, &mut pmap, &mut dictionary)
            .unwrap();

        assert_eq!(message.len(), 2);
        assert_eq!(message.get(35), Some(&Value::String("0".to_string())));
        assert_eq!(message.get(34), Some(&Value::UInt32(5)));
        let ids: Vec<u64> = message.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![35, 34]);
    }

    #[test]
    fn test_store_register_and_get() {
        let mut store = TemplateStore::new();
        assert!(store.is_empty());
        assert!(store.register(heartbeat()).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).map(Template::name), Some("Heartbeat"));
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_store_register_replaces_same_id() {
        let mut store = TemplateStore::new();
        store.register(heartbeat());
        let replaced = store.register(Template::new(1, "Logon", Vec::new()));
        assert_eq!(replaced.map(|t| t.name().to_string()), Some("Heartbeat".to_string()));
        assert_eq!(store.get(1).map(Template::name), Some("Logon"));
    }
}
