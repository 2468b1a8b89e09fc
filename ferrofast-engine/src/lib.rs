/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! # FerroFAST Engine
//!
//! High-level decoding facade for the FerroFAST protocol implementation.
//!
//! This crate provides:
//! - **Engine**: Shared, immutable template store behind an `Arc`
//! - **Sessions**: Per-stream decoders with their own dictionaries
//! - **Builder API**: Fluent configuration for engine setup

pub mod engine;
pub mod session;

pub use engine::{EngineBuilder, FastEngine};
pub use session::DecodeSession;
