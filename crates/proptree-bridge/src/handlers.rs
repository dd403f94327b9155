//! Value handlers: types delivered as values rather than objects.

use std::collections::HashMap;

use proptree_core::TypeId;
use proptree_reflect::PrimitiveKind;
use strum::IntoEnumIterator;

/// How a handled type reaches the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueHandler {
    /// Read as a primitive of the given kind and delivered through
    /// `visit_value`.
    Primitive(PrimitiveKind),
    /// Rendered as text and delivered through `visit_text`.
    Text,
}

/// Handlers by type identity.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<TypeId, ValueHandler>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry handling every primitive kind.
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        for kind in PrimitiveKind::iter() {
            registry.register(kind.type_id(), ValueHandler::Primitive(kind));
        }
        registry
    }

    /// Register or replace the handler for a type.
    pub fn register(&mut self, type_id: TypeId, handler: ValueHandler) {
        self.handlers.insert(type_id, handler);
    }

    /// Handler for a type.
    pub fn get(&self, type_id: &TypeId) -> Option<ValueHandler> {
        self.handlers.get(type_id).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
