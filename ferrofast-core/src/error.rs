/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Error types for the FerroFAST decoding engine.
//!
//! This module provides the unified error hierarchy using `thiserror` for
//! typed, domain-specific errors across all FerroFAST operations. Decode
//! failures form a small closed set of kinds; each kind carries structured
//! context (field id, field name, operator label) so callers can localize
//! the fault inside a template.

use thiserror::Error;

/// Result type alias using [`FastError`] as the error type.
pub type Result<T> = std::result::Result<T, FastError>;

/// Top-level error type for all FerroFAST operations.
#[derive(Debug, Error)]
pub enum FastError {
    /// Error during message decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error during template construction.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Errors that occur while decoding a FAST message.
///
/// Decoding halts at the first error; nothing is retried mid-message. The
/// dictionary is left in its last successful state and the caller decides
/// whether to reset the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Byte source exhausted before a primitive completed.
    #[error("unexpected end of input")]
    Underflow,

    /// No byte with the stop bit set was found within the integer's width.
    #[error("stop bit not found within {max_bytes} bytes")]
    StopBitOverflow {
        /// Maximum number of bytes the width permits.
        max_bytes: usize,
    },

    /// Checked delta or increment arithmetic overflowed the field's width.
    #[error("{delta} + {previous} would overflow {width}")]
    OperatorOverflow {
        /// The signed delta read from the stream (1 for increments).
        delta: i128,
        /// The prior value the delta was applied to.
        previous: i128,
        /// Label of the target width, e.g. `"int32"` or `"uint64"`.
        width: &'static str,
    },

    /// Delta or tail applied while the prior dictionary slot was empty.
    #[error("cannot delta a null previous value")]
    NullPrevious,

    /// A required field had neither a prior value nor an initial value.
    #[error("field is mandatory but has no prior or initial value")]
    MissingInitial,

    /// Template id absent from the store.
    #[error("no template found in store to deserialise message with ID: {0}")]
    UnknownTemplate(u32),

    /// The header's template-id indicator bit was unset.
    #[error("message must have template id encoded")]
    MissingTemplateId,

    /// A delta splice asked to remove more values than the base holds.
    #[error("cannot remove {count} values")]
    SpliceOutOfRange {
        /// Number of values the splice tried to remove.
        count: usize,
        /// Length of the base value the splice ran against.
        base_length: usize,
    },

    /// Mantissa could not be decoded after a non-null exponent.
    #[error("decimal mantissa missing after a non-null exponent")]
    DecimalExponentOnly,

    /// Unicode string bytes were not valid UTF-8.
    #[error("invalid utf-8 in unicode field: {0}")]
    InvalidUnicode(#[from] std::str::Utf8Error),

    /// The prior dictionary value has a different type than the field.
    #[error("previous value is {found}, expected {expected}")]
    PreviousTypeMismatch {
        /// Type label the field expected.
        expected: &'static str,
        /// Type label found in the dictionary slot.
        found: &'static str,
    },

    /// Failure while decoding a specific field, with its template context.
    #[error("field {name} (id {id}, {operator} operator): {source}")]
    Field {
        /// Field id from the template.
        id: u64,
        /// Field name keying the dictionary slot.
        name: String,
        /// Label of the operator attached to the field.
        operator: &'static str,
        /// The underlying decode failure.
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wraps this error with the field context it occurred in.
    ///
    /// Errors that already carry field context are returned unchanged so
    /// nested composites do not stack redundant wrappers.
    #[must_use]
    pub fn in_field(self, id: u64, name: &str, operator: &'static str) -> Self {
        match self {
            err @ Self::Field { .. } => err,
            err => Self::Field {
                id,
                name: name.to_string(),
                operator,
                source: Box::new(err),
            },
        }
    }

    /// Returns the innermost error, unwrapping any field-context layers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            err => err,
        }
    }
}

/// Errors raised while assembling a template through the builder.
///
/// These are the static operator/type rules FAST imposes on templates;
/// they are checked once at build time so the decode path never has to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Constant fields must carry a constant value.
    #[error("constant operator on field {name} requires a value")]
    ConstantWithoutValue {
        /// Name of the offending field.
        name: String,
    },

    /// Default on a required field must carry a default value.
    #[error("default operator on required field {name} requires a value")]
    DefaultWithoutValue {
        /// Name of the offending field.
        name: String,
    },

    /// The operator cannot be attached to a field of this type.
    #[error("{operator} operator is not applicable to {kind} field {name}")]
    OperatorNotApplicable {
        /// Label of the operator.
        operator: &'static str,
        /// Type label of the field.
        kind: &'static str,
        /// Name of the offending field.
        name: String,
    },

    /// Two fields in one template carry the same id.
    #[error("duplicate field id {id} in template {template}")]
    DuplicateField {
        /// Id of the template being built.
        template: u32,
        /// The duplicated field id.
        id: u64,
    },
}
