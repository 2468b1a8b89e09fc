/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! # FerroFAST Operator
//!
//! Field operators and the dictionary state they run against.
//!
//! A FAST field is decoded relative to three inputs: the presence map,
//! the stream, and the prior value in the dictionary. This crate models
//! the seven operators of the protocol and the three-state dictionary
//! slots they read and write.
//!
//! ## Features
//!
//! - **Operators**: None, Constant, Default, Copy, Increment, Delta, Tail
//! - **Dictionary**: Per-session prior values keyed by field name
//! - **Checked arithmetic**: Increments and deltas fail on width overflow

pub mod dictionary;
pub mod operator;

pub use dictionary::{DictEntry, Dictionary};
pub use operator::Operator;
