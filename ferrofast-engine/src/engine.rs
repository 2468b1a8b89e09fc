/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Engine assembly and fluent configuration.
//!
//! This module provides a builder API for assembling a decoding engine
//! from templates, and the engine facade that mints decode sessions
//! over the shared store.

use crate::session::DecodeSession;
use ferrofast_template::{Template, TemplateStore};
use std::sync::Arc;

/// A configured decoding engine.
///
/// The engine owns the template store behind an [`Arc`]; sessions
/// minted from it share the store but keep their own dictionaries, so
/// one engine can serve many independent streams.
#[derive(Debug, Clone)]
pub struct FastEngine {
    store: Arc<TemplateStore>,
}

impl FastEngine {
    /// Starts a builder with no templates registered.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Creates a fresh session over this engine's templates.
    #[must_use]
    pub fn session(&self) -> DecodeSession {
        DecodeSession::new(Arc::clone(&self.store))
    }

    /// Returns the shared template store.
    #[must_use]
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }
}

/// Builder for configuring a decoding engine.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    store: TemplateStore,
}

impl EngineBuilder {
    /// Creates a new engine builder with an empty template store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: TemplateStore::new(),
        }
    }

    /// Registers a template, replacing any earlier one under the same id.
    #[must_use]
    pub fn add_template(mut self, template: Template) -> Self {
        self.store.register(template);
        self
    }

    /// Returns the templates registered so far.
    #[must_use]
    pub fn templates(&self) -> &TemplateStore {
        &self.store
    }

    /// Finishes configuration and assembles the engine.
    #[must_use]
    pub fn build(self) -> FastEngine {
        FastEngine {
            store: Arc::new(self.store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrofast_core::FieldProperties;
    use ferrofast_operator::Operator;
    use ferrofast_template::TemplateBuilder;

    fn order_template(id: u32) -> Template {
        TemplateBuilder::new(id, "Order")
            .uint32(FieldProperties::required(34, "MsgSeqNum"), Operator::None)
            .build()
            .unwrap()
    }

    #[test]
    fn test_engine_builder_default() {
        let builder = EngineBuilder::new();
        assert!(builder.templates().is_empty());
    }

    #[test]
    fn test_engine_builder_registers_templates() {
        let builder = FastEngine::builder()
            .add_template(order_template(1))
            .add_template(order_template(2));

        assert_eq!(builder.templates().len(), 2);

        let engine = builder.build();
        assert!(engine.store().get(1).is_some());
        assert!(engine.store().get(2).is_some());
        assert!(engine.store().get(3).is_none());
    }

    #[test]
    fn test_engine_builder_replaces_duplicate_id() {
        let engine = FastEngine::builder()
            .add_template(order_template(1))
            .add_template(
                TemplateBuilder::new(1, "Replacement")
                    .build()
                    .unwrap(),
            )
            .build();

        assert_eq!(engine.store().len(), 1);
        assert_eq!(engine.store().get(1).map(Template::name), Some("Replacement"));
    }

    #[test]
    fn test_engine_clones_share_one_store() {
        let engine = FastEngine::builder().add_template(order_template(7)).build();
        let clone = engine.clone();

        assert!(clone.store().get(7).is_some());
        assert_eq!(engine.store().len(), clone.store().len());
    }
}
