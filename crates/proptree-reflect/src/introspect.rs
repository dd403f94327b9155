//! The introspection contract consumed by the traversal engine.

use proptree_core::TypeId;

use crate::descriptor::{ClassDescriptor, ElementDescriptor};
use crate::handle::InstanceHandle;
use crate::primitive::{Primitive, PrimitiveKind};

/// Receiver of depth-first enumeration callbacks.
///
/// The lifetime ties the descriptors handed to [`begin`](Self::begin) to the
/// introspection context, so a sink may keep them for the duration of the
/// enumeration.
pub trait EnumerationSink<'a> {
    /// Called when a node is entered.
    ///
    /// Returning `false` skips the node's children; [`end`](Self::end) is
    /// still delivered for the node.
    fn begin(
        &mut self,
        instance: InstanceHandle,
        class: &'a ClassDescriptor,
        element: Option<&'a ElementDescriptor>,
    ) -> bool;

    /// Called when a node is exited. Returning `false` aborts the whole
    /// enumeration.
    fn end(&mut self) -> bool;
}

/// A runtime type-introspection system over an externally owned object
/// graph.
pub trait Introspection {
    /// Whether edit-time metadata (labels, groups, handlers) is available.
    fn has_edit_metadata(&self) -> bool;

    /// Look up the class registered for a type.
    fn find_class(&self, type_id: &TypeId) -> Option<&ClassDescriptor>;

    /// Enumerate `root` depth-first, reporting every node to `sink`.
    ///
    /// Returns `false` if the enumeration was aborted by the sink.
    fn enumerate<'a>(
        &'a self,
        root: InstanceHandle,
        type_id: &TypeId,
        sink: &mut dyn EnumerationSink<'a>,
    ) -> bool;

    /// Follow pointer storage to the pointee.
    fn resolve_pointer(&self, instance: InstanceHandle) -> Option<InstanceHandle> {
        Some(instance)
    }

    /// Look up the value stored under `key` in an associative container.
    fn value_by_key(&self, container: InstanceHandle, key: InstanceHandle)
    -> Option<InstanceHandle>;

    /// Read a primitive scalar as the given kind.
    fn read_primitive(&self, instance: InstanceHandle, kind: PrimitiveKind) -> Option<Primitive>;

    /// Read a built-in string.
    fn read_string(&self, instance: InstanceHandle) -> Option<String>;

    /// Render an enumerated value by name.
    fn enum_string(
        &self,
        instance: InstanceHandle,
        enum_type: &TypeId,
        underlying: Option<&TypeId>,
    ) -> Option<String>;

    /// Render arbitrary data as text using the type's serializer.
    fn data_to_text(&self, instance: InstanceHandle, type_id: &TypeId) -> Option<String>;
}
