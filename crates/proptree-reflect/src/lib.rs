//! Introspection layer for proptree.
//!
//! The traversal engine never touches object storage directly. It talks to
//! an [`Introspection`] context that enumerates instances depth-first and
//! reports each node together with its [`ClassDescriptor`] and, for fields
//! and container slots, its [`ElementDescriptor`]. Metadata attributes are
//! declared by numeric [`AttributeId`](proptree_core::AttributeId) and
//! resolved to names through the [`AttributeRegistry`].
//!
//! The [`memory`] module provides a complete in-memory context used by the
//! command-line tool and the test suites.

mod attribute;
mod descriptor;
mod handle;
mod introspect;
pub mod memory;
mod primitive;
mod registry;

pub use attribute::{Attribute, AttributeList, AttributeValue, InstanceReader};
pub use descriptor::{
    ClassDescriptor, ClassEditData, ContainerDescriptor, ContainerKind, ElementDescriptor,
    ElementEditData,
};
pub use handle::InstanceHandle;
pub use introspect::{EnumerationSink, Introspection};
pub use primitive::{Primitive, PrimitiveKind};
pub use registry::{AttributeDefinition, AttributeRegistry, RegistryError, TypedAttribute, ValueKind};
