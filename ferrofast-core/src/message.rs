/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Decoded message representation.
//!
//! A [`Message`] is an ordered mapping from field id to [`Value`] — the
//! reconstructed FIX message the engine hands to the caller. Field order
//! follows template order; the template guarantees ids are unique within
//! one message, so lookup is a linear scan over a small vector.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// An ordered collection of decoded `(field id, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    fields: Vec<(u64, Value)>,
}

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Creates an empty message with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Appends a field to the message.
    pub fn insert(&mut self, id: u64, value: Value) {
        self.fields.push((id, value));
    }

    /// Returns the value of the first field with the given id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field_id, _)| *field_id == id)
            .map(|(_, value)| value)
    }

    /// Returns `true` if a field with the given id is present.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Number of fields in the message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the message holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(id, value)` pairs in decode order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Value)> {
        self.fields.iter().map(|(id, value)| (*id, value))
    }

    /// Returns the underlying ordered field slice.
    #[must_use]
    pub fn fields(&self) -> &[(u64, Value)] {
        &self.fields
    }
}

impl FromIterator<(u64, Value)> for Message {
    fn from_iter<I: IntoIterator<Item = (u64, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Message {
    type Item = (u64, Value);
    type IntoIter = std::vec::IntoIter<(u64, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut msg = Message::new();
        msg.insert(34, Value::UInt32(10));
        msg.insert(52, Value::UInt64(11));
        assert_eq!(msg.get(34), Some(&Value::UInt32(10)));
        assert_eq!(msg.get(52), Some(&Value::UInt64(11)));
        assert_eq!(msg.get(35), None);
        assert_eq!(msg.len(), 2);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut msg = Message::new();
        msg.insert(1128, Value::from("9"));
        msg.insert(35, Value::from("0"));
        msg.insert(34, Value::UInt32(10));
        let ids: Vec<u64> = msg.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1128, 35, 34]);
    }

    #[test]
    fn test_null_field_is_present() {
        let mut msg = Message::new();
        msg.insert(34, Value::Null);
        assert!(msg.contains(34));
        assert_eq!(msg.get(34), Some(&Value::Null));
    }

    #[test]
    fn test_from_iterator() {
        let msg: Message = [(2, Value::Int64(3)), (3, Value::from("TEST1"))]
            .into_iter()
            .collect();
        assert_eq!(msg.len(), 2);
        assert_eq!(msg.get(3), Some(&Value::from("TEST1")));
    }

    #[test]
    fn test_empty() {
        let msg = Message::new();
        assert!(msg.is_empty());
        assert!(msg.fields().is_empty());
    }
}
