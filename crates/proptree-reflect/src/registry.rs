//! Attribute naming service and typed attribute definitions.

use std::collections::HashMap;
use std::fmt;

use proptree_core::{AttributeId, Name, Value, names};
use thiserror::Error;

use crate::attribute::Attribute;
use crate::handle::InstanceHandle;

/// Errors raised while registering attributes.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two different names hash to the same id.
    #[error("Attribute '{name}' collides with '{existing}' on id {id}")]
    IdCollision {
        name: Name,
        existing: Name,
        id: AttributeId,
    },
}

/// A typed reader for one attribute name.
pub trait AttributeDefinition: Send + Sync {
    /// Attribute name this definition applies to.
    fn name(&self) -> &Name;

    /// Read the attribute into a document value. `None` lets the next
    /// definition (or the generic reader) try.
    fn read(&self, attribute: &Attribute, instance: Option<InstanceHandle>) -> Option<Value>;
}

/// Value kind a [`TypedAttribute`] coerces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Uint,
    Double,
    String,
}

impl ValueKind {
    fn coerce(self, value: Value) -> Option<Value> {
        match self {
            Self::Bool => value
                .as_bool()
                .or_else(|| value.as_i64().map(|v| v != 0))
                .or_else(|| value.as_u64().map(|v| v != 0))
                .map(Value::Bool),
            Self::Int => value.as_i64().map(Value::Int),
            Self::Uint => value.as_u64().map(Value::Uint),
            Self::Double => value.as_f64().map(Value::Double),
            Self::String => match value {
                Value::String(s) => Some(Value::String(s)),
                _ => None,
            },
        }
    }
}

/// Definition that reads an attribute generically and coerces it to one
/// value kind.
#[derive(Debug, Clone)]
pub struct TypedAttribute {
    name: Name,
    kind: ValueKind,
}

impl TypedAttribute {
    /// Create a typed definition.
    pub fn new(name: impl Into<Name>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl AttributeDefinition for TypedAttribute {
    fn name(&self) -> &Name {
        &self.name
    }

    fn read(&self, attribute: &Attribute, instance: Option<InstanceHandle>) -> Option<Value> {
        self.kind.coerce(attribute.read(instance)?)
    }
}

/// Maps attribute ids back to names and holds typed definitions per name.
///
/// The registry is built once and shared immutably by every traversal.
#[derive(Default)]
pub struct AttributeRegistry {
    names: HashMap<AttributeId, Name>,
    definitions: HashMap<Name, Vec<Box<dyn AttributeDefinition>>>,
}

impl AttributeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry knowing every well-known attribute name, the
    /// visibility tags and the typed definitions of the flag-like
    /// attributes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for name in names::ALL {
            registry.insert_name(Name::new(*name));
        }
        registry.register_definition(TypedAttribute::new(names::READ_ONLY, ValueKind::Bool));
        registry.register_definition(TypedAttribute::new(
            names::NAME_LABEL_OVERRIDE,
            ValueKind::String,
        ));
        registry.register_definition(TypedAttribute::new(
            names::ENUM_UNDERLYING_TYPE,
            ValueKind::String,
        ));
        registry.register_definition(TypedAttribute::new(
            names::CONTAINER_CAN_BE_MODIFIED,
            ValueKind::Bool,
        ));
        registry
    }

    fn insert_name(&mut self, name: Name) -> AttributeId {
        let id = name.id();
        self.names.entry(id).or_insert(name);
        id
    }

    /// Register a name so its id can be resolved.
    pub fn register_name(&mut self, name: impl Into<Name>) -> Result<AttributeId, RegistryError> {
        let name = name.into();
        let id = name.id();
        match self.names.get(&id) {
            Some(existing) if *existing != name => Err(RegistryError::IdCollision {
                name,
                existing: existing.clone(),
                id,
            }),
            Some(_) => Ok(id),
            None => Ok(self.insert_name(name)),
        }
    }

    /// Register a typed definition. Its name becomes resolvable as well.
    pub fn register_definition(&mut self, definition: impl AttributeDefinition + 'static) {
        let name = definition.name().clone();
        self.insert_name(name.clone());
        self.definitions
            .entry(name)
            .or_default()
            .push(Box::new(definition));
    }

    /// Resolve an id to its registered name.
    pub fn lookup_name(&self, id: AttributeId) -> Option<&Name> {
        self.names.get(&id)
    }

    /// Visit the definitions registered for `name` in registration order
    /// until `callback` returns `false`.
    pub fn enumerate_registered(
        &self,
        name: &Name,
        mut callback: impl FnMut(&dyn AttributeDefinition) -> bool,
    ) {
        for definition in self.definitions.get(name).into_iter().flatten() {
            if !callback(definition.as_ref()) {
                break;
            }
        }
    }

    /// Number of resolvable names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no names are registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRegistry")
            .field("names", &self.names.len())
            .field("definitions", &self.definitions.len())
            .finish()
    }
}
