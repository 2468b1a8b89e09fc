/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! # FerroFAST Codec
//!
//! Transfer-encoding primitives for the FAST (FIX Adapted for STreaming)
//! protocol: stop-bit integers and strings, length-prefixed byte vectors,
//! and presence maps.
//!
//! ## Features
//!
//! - **Cursor**: Forward-only position over an input buffer
//! - **Stop-bit readers**: Width-capped integer, string, and byte-vector reads
//! - **Presence maps**: Bit streams that drive operator-bearing fields
//! - **Writer**: The encode-side mirror, for tests and feed tooling

pub mod cursor;
pub mod pmap;
pub mod reader;
pub mod writer;

pub use cursor::Cursor;
pub use pmap::{PresenceMap, PresenceMapBuilder};
pub use writer::FastWriter;
