/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! # FerroFAST
//!
//! A high-performance FAST protocol decoder for Rust.
//!
//! FerroFAST decodes FAST (FIX Adapted for STreaming) market data: stop-bit
//! transfer encoding, presence maps, and the full operator set (constant,
//! default, copy, increment, delta, tail) over template-described messages.
//!
//! ## Features
//!
//! - **Template-driven**: Messages decode against a validated template store
//! - **Stateful operators**: Per-session dictionaries track prior values
//! - **First-class null**: Optional fields decode to a real null value
//! - **Composites**: Decimals and nested sequences with per-entry presence maps
//! - **Shared engines**: One immutable store serves many independent sessions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ferrofast::prelude::*;
//!
//! // Describe the wire layout once
//! let template = TemplateBuilder::new(2, "Quote")
//!     .uint64(FieldProperties::required(34, "MsgSeqNum"), Operator::Increment(None))
//!     .ascii(FieldProperties::required(55, "Symbol"), Operator::Copy(None))
//!     .decimal(
//!         FieldProperties::required(132, "BidPx"),
//!         Operator::None,
//!         Operator::Delta(None),
//!     )
//!     .build()?;
//!
//! // One engine, one session per stream
//! let engine = FastEngine::builder().add_template(template).build();
//! let mut session = engine.session();
//! let message = session.decode(&frame)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Value model, field metadata, and error definitions
//! - [`codec`]: Stop-bit transfer encoding and presence maps
//! - [`operator`]: Field operators and the prior-value dictionary
//! - [`template`]: Field units, composites, builder, and template store
//! - [`engine`]: High-level engine facade and decode sessions

pub mod core {
    //! Value model, field metadata, and error definitions.
    pub use ferrofast_core::*;
}

pub mod codec {
    //! Stop-bit transfer encoding and presence maps.
    pub use ferrofast_codec::*;
}

pub mod operator {
    //! Field operators and the prior-value dictionary.
    pub use ferrofast_operator::*;
}

pub mod template {
    //! Field units, composites, builder, and template store.
    pub use ferrofast_template::*;
}

pub mod engine {
    //! High-level engine facade and decode sessions.
    pub use ferrofast_engine::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use ferrofast_core::{
        DecodeError, FastError, FieldProperties, Message, Result, TemplateError, Value,
    };

    // Transfer encoding
    pub use ferrofast_codec::{Cursor, FastWriter, PresenceMap, PresenceMapBuilder};

    // Operators
    pub use ferrofast_operator::{DictEntry, Dictionary, Operator};

    // Templates
    pub use ferrofast_template::{
        DecimalField, FieldUnit, ScalarField, SequenceField, Template, TemplateBuilder,
        TemplateStore,
    };

    // Engine
    pub use ferrofast_engine::{DecodeSession, EngineBuilder, FastEngine};
}
