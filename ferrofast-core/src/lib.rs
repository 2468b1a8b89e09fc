/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! # FerroFAST Core
//!
//! Core types and error definitions for the FerroFAST FAST protocol
//! decoding engine.
//!
//! This crate provides the fundamental building blocks used across all
//! FerroFAST crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Value model**: [`Value`] — the tagged sum of every decodable type,
//!   with first-class Null
//! - **Field metadata**: [`FieldProperties`] binding id, dictionary name,
//!   and the required flag
//! - **Message model**: [`Message`] — the ordered id → value mapping the
//!   engine produces
//!
//! ## Null Discipline
//!
//! Null is a value, not an absence. Every field decode emits exactly one
//! [`Value`], possibly [`Value::Null`]; downstream state distinguishes
//! "never written" from "written null".

pub mod error;
pub mod field;
pub mod message;
pub mod value;

pub use error::{DecodeError, FastError, Result, TemplateError};
pub use field::FieldProperties;
pub use message::Message;
pub use value::Value;
