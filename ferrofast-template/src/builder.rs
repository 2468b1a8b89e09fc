/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Programmatic template construction.
//!
//! The builder assembles a template field by field, then checks the
//! static rules once at build time so the decode path never has to:
//! constants carry a value, required defaults carry a value, increments
//! stay on integers, tails stay on strings and byte vectors, and ids are
//! unique across the whole template including sequence entries.

use crate::decimal::DecimalField;
use crate::sequence::SequenceField;
use crate::template::Template;
use crate::unit::{FieldUnit, ScalarField, ScalarKind};
use ferrofast_core::{FieldProperties, TemplateError};
use ferrofast_operator::Operator;
use std::collections::HashSet;

/// Builder for [`Template`] with build-time validation.
#[derive(Debug)]
pub struct TemplateBuilder {
    id: u32,
    name: String,
    units: Vec<FieldUnit>,
}

impl TemplateBuilder {
    /// Starts a template under the given id and name.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            units: Vec::new(),
        }
    }

    /// Adds an unsigned 32-bit integer field.
    #[must_use]
    pub fn uint32(mut self, properties: FieldProperties, operator: Operator) -> Self {
        self.units
            .push(FieldUnit::UInt32(ScalarField::new(properties, operator)));
        self
    }

    /// Adds a signed 32-bit integer field.
    #[must_use]
    pub fn int32(mut self, properties: FieldProperties, operator: Operator) -> Self {
        self.units
            .push(FieldUnit::Int32(ScalarField::new(properties, operator)));
        self
    }

    /// Adds an unsigned 64-bit integer field.
    #[must_use]
    pub fn uint64(mut self, properties: FieldProperties, operator: Operator) -> Self {
        self.units
            .push(FieldUnit::UInt64(ScalarField::new(properties, operator)));
        self
    }

    /// Adds a signed 64-bit integer field.
    #[must_use]
    pub fn int64(mut self, properties: FieldProperties, operator: Operator) -> Self {
        self.units
            .push(FieldUnit::Int64(ScalarField::new(properties, operator)));
        self
    }

    /// Adds an ASCII string field.
    #[must_use]
    pub fn ascii(mut self, properties: FieldProperties, operator: Operator) -> Self {
        self.units
            .push(FieldUnit::Ascii(ScalarField::new(properties, operator)));
        self
    }

    /// Adds a Unicode string field.
    #[must_use]
    pub fn unicode(mut self, properties: FieldProperties, operator: Operator) -> Self {
        self.units
            .push(FieldUnit::Unicode(ScalarField::new(properties, operator)));
        self
    }

    /// Adds a byte-vector field.
    #[must_use]
    pub fn byte_vector(mut self, properties: FieldProperties, operator: Operator) -> Self {
        self.units
            .push(FieldUnit::ByteVector(ScalarField::new(properties, operator)));
        self
    }

    /// Adds a decimal field with per-component operators.
    #[must_use]
    pub fn decimal(
        mut self,
        properties: FieldProperties,
        exponent: Operator,
        mantissa: Operator,
    ) -> Self {
        self.units.push(FieldUnit::Decimal(DecimalField::new(
            properties, exponent, mantissa,
        )));
        self
    }

    /// Adds a sequence field with a length operator and inner units.
    #[must_use]
    pub fn sequence(
        mut self,
        properties: FieldProperties,
        length_operator: Operator,
        fields: Vec<FieldUnit>,
    ) -> Self {
        self.units.push(FieldUnit::Sequence(SequenceField::new(
            properties,
            length_operator,
            fields,
        )));
        self
    }

    /// Validates the static rules and produces the template.
    ///
    /// # Errors
    ///
    /// Returns the first [`TemplateError`] the field walk encounters.
    pub fn build(self) -> Result<Template, TemplateError> {
        let mut seen = HashSet::new();
        validate_units(self.id, &self.units, &mut seen)?;
        Ok(Template::new(self.id, self.name, self.units))
    }
}

fn validate_units(
    template: u32,
    units: &[FieldUnit],
    seen: &mut HashSet<u64>,
) -> Result<(), TemplateError> {
    for unit in units {
        let id = unit.tag_id();
        if !seen.insert(id) {
            return Err(TemplateError::DuplicateField { template, id });
        }
        match unit {
            FieldUnit::UInt32(field) => validate_scalar(ScalarKind::UInt32, field)?,
            FieldUnit::Int32(field) => validate_scalar(ScalarKind::Int32, field)?,
            FieldUnit::UInt64(field) => validate_scalar(ScalarKind::UInt64, field)?,
            FieldUnit::Int64(field) => validate_scalar(ScalarKind::Int64, field)?,
            FieldUnit::Ascii(field) => validate_scalar(ScalarKind::Ascii, field)?,
            FieldUnit::Unicode(field) => validate_scalar(ScalarKind::Unicode, field)?,
            FieldUnit::ByteVector(field) => validate_scalar(ScalarKind::ByteVector, field)?,
            FieldUnit::Decimal(field) => {
                validate_scalar(ScalarKind::Int32, field.exponent())?;
                validate_scalar(ScalarKind::Int64, field.mantissa())?;
            }
            FieldUnit::Sequence(field) => {
                validate_scalar(ScalarKind::UInt32, field.length())?;
                validate_units(template, field.fields(), seen)?;
            }
        }
    }
    Ok(())
}

fn validate_scalar(kind: ScalarKind, field: &ScalarField) -> Result<(), TemplateError> {
    let name = &field.properties.name;
    match &field.operator {
        Operator::Constant(value) if value.is_null() => Err(TemplateError::ConstantWithoutValue {
            name: name.clone(),
        }),
        Operator::Default(None) if field.properties.required => {
            Err(TemplateError::DefaultWithoutValue { name: name.clone() })
        }
        Operator::Increment(_) if !kind.is_integer() => Err(TemplateError::OperatorNotApplicable {
            operator: "increment",
            kind: kind.label(),
            name: name.clone(),
        }),
        Operator::Tail(_) if kind.is_integer() => Err(TemplateError::OperatorNotApplicable {
            operator: "tail",
            kind: kind.label(),
            name: name.clone(),
        }),
        _ => Ok(()),
    }
}
