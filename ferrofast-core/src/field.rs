/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Field metadata shared by every template unit.
//!
//! [`FieldProperties`] binds a FIX tag id, the name keying the field's
//! dictionary slot, and the required flag. The id lands in the decoded
//! message; the name addresses operator state. Two fields may share an id
//! (a decimal's exponent and mantissa do) while keeping distinct names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity and presence metadata of a template field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProperties {
    /// FIX tag id emitted into the decoded message.
    pub id: u64,
    /// Name keying this field's dictionary slot.
    pub name: String,
    /// Whether the field is mandatory on the wire.
    pub required: bool,
}

impl FieldProperties {
    /// Creates field properties.
    ///
    /// # Arguments
    ///
    /// * `id` - FIX tag id of the field
    /// * `name` - Dictionary key for the field's operator state
    /// * `required` - Whether the field is mandatory
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, required: bool) -> Self {
        Self {
            id,
            name: name.into(),
            required,
        }
    }

    /// Creates properties for a mandatory field.
    #[must_use]
    pub fn required(id: u64, name: impl Into<String>) -> Self {
        Self::new(id, name, true)
    }

    /// Creates properties for an optional field.
    #[must_use]
    pub fn optional(id: u64, name: impl Into<String>) -> Self {
        Self::new(id, name, false)
    }

    /// Returns a copy of these properties under a derived name.
    ///
    /// Used by composite fields whose components share the parent id but
    /// need their own dictionary slots.
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            id: self.id,
            name: format!("{}.{}", self.name, suffix),
            required: self.required,
        }
    }
}

impl fmt::Display for FieldProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {})", self.name, self.id)
    }
}
