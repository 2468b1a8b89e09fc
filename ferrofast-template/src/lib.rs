/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! # FerroFAST Template
//!
//! Template model for the FerroFAST decoding engine: field units over
//! all FAST wire types, decimal and sequence composites, a validating
//! builder, and the id-indexed store the decoder routes messages by.
//!
//! ## Features
//!
//! - **Field units**: Integers, strings, byte vectors, decimals, sequences
//! - **Builder**: Static operator and id validation at build time
//! - **Store**: Template lookup by the header's template id

pub mod builder;
pub mod decimal;
pub mod sequence;
pub mod template;
pub mod unit;

pub use builder::TemplateBuilder;
pub use decimal::DecimalField;
pub use sequence::SequenceField;
pub use template::{Template, TemplateStore};
pub use unit::{FieldUnit, ScalarField};
