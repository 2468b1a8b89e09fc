/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Dictionary state for field operators.
//!
//! Operators that reference prior values read and write a dictionary keyed
//! by field name. A slot distinguishes between never written, explicitly
//! null, and holding a value; the three states drive different operator
//! fallbacks.

use ferrofast_core::Value;
use std::collections::HashMap;

/// State of a dictionary slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DictEntry {
    /// No value has been set.
    #[default]
    Undefined,
    /// The last decoded value was explicitly null.
    Empty,
    /// The last decoded value.
    Assigned(Value),
}

impl DictEntry {
    /// Returns true if the slot was never written.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true if the slot holds an explicit null.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the assigned value, if the slot holds one.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Assigned(value) => Some(value),
            _ => None,
        }
    }
}

/// Per-session dictionary shared by all templates.
///
/// Slots are keyed by field name, so two templates naming a field the
/// same way share its prior value.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    slots: HashMap<String, DictEntry>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `name`, or [`DictEntry::Undefined`] if it was
    /// never written.
    #[must_use]
    pub fn get(&self, name: &str) -> &DictEntry {
        self.slots.get(name).unwrap_or(&DictEntry::Undefined)
    }

    /// Records a decoded value: null becomes [`DictEntry::Empty`], any
    /// other value is assigned.
    pub fn set(&mut self, name: &str, value: &Value) {
        let entry = if value.is_null() {
            DictEntry::Empty
        } else {
            DictEntry::Assigned(value.clone())
        };
        self.slots.insert(name.to_string(), entry);
    }

    /// Forgets all slots.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Returns the number of written slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot was ever written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over the written slots in arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DictEntry)> {
        self.slots.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_slot_is_undefined() {
        let dict = Dictionary::new();
        assert!(dict.get("Price").is_undefined());
        assert!(dict.is_empty());
    }

    #[test]
    fn test_set_assigns_value() {
        let mut dict = Dictionary::new();
        dict.set("MsgSeqNum", &Value::UInt32(7));
        assert_eq!(
            dict.get("MsgSeqNum"),
            &DictEntry::Assigned(Value::UInt32(7))
        );
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_set_null_marks_slot_empty() {
        let mut dict = Dictionary::new();
        dict.set("Symbol", &Value::String("EURUSD".to_string()));
        dict.set("Symbol", &Value::Null);
        assert!(dict.get("Symbol").is_empty());
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut dict = Dictionary::new();
        dict.set("Symbol", &Value::String("EURUSD".to_string()));
        dict.reset();
        assert!(dict.get("Symbol").is_undefined());
    }

    #[test]
    fn test_entry_accessors() {
        let entry = DictEntry::Assigned(Value::Int32(-5));
        assert_eq!(entry.as_value(), Some(&Value::Int32(-5)));
        assert!(!entry.is_undefined());
        assert!(DictEntry::Empty.as_value().is_none());
    }
}
