//! Core types for proptree.
//!
//! This crate provides the vocabulary shared by the introspection layer and
//! the traversal engine: the generic document [`Value`], names and numeric
//! attribute identifiers, type identities, the visibility states, error and
//! warning types, and traversal configuration.

mod attributes;
mod config;
mod error;
mod name;
mod value;
mod visibility;

pub use attributes::{AttributeData, names};
pub use config::{TraversalConfig, TraversalConfigBuilder, TraversalConfigBuilderError};
pub use error::{BridgeError, TraversalWarning, WarningKind};
pub use name::{AttributeId, Name, TypeId};
pub use value::{Object, Value};
pub use visibility::Visibility;
