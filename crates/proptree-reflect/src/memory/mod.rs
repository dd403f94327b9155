//! In-memory introspection context.
//!
//! [`TypeRegistry`] holds class metadata, [`ObjectGraph`] holds instances,
//! and [`MemoryIntrospection`] exposes both through the [`Introspection`]
//! contract.

mod graph;
mod types;

pub use graph::{Data, Instance, ObjectGraph};
pub use types::{ClassBuilder, EnumDescriptor, TypeRegistry};

use proptree_core::TypeId;

use crate::descriptor::{ClassDescriptor, ElementDescriptor};
use crate::handle::InstanceHandle;
use crate::introspect::{EnumerationSink, Introspection};
use crate::primitive::{Primitive, PrimitiveKind};

/// [`Introspection`] over a [`TypeRegistry`] and an [`ObjectGraph`].
#[derive(Debug, Clone, Copy)]
pub struct MemoryIntrospection<'r> {
    types: &'r TypeRegistry,
    graph: &'r ObjectGraph,
}

impl<'r> MemoryIntrospection<'r> {
    /// Create a context.
    pub fn new(types: &'r TypeRegistry, graph: &'r ObjectGraph) -> Self {
        Self { types, graph }
    }

    /// The type registry.
    pub fn types(&self) -> &'r TypeRegistry {
        self.types
    }

    /// The object graph.
    pub fn graph(&self) -> &'r ObjectGraph {
        self.graph
    }

    fn follow(&self, instance: InstanceHandle) -> Option<InstanceHandle> {
        match self.graph.data(instance)? {
            Data::Pointer(target) => *target,
            _ => Some(instance),
        }
    }

    /// Class of a child instance: the runtime type of its storage (or of
    /// the pointee), falling back to the declared element type.
    fn class_of(
        &self,
        instance: InstanceHandle,
        element: &ElementDescriptor,
    ) -> Option<&'r ClassDescriptor> {
        let storage = if element.is_pointer {
            self.follow(instance)?
        } else {
            instance
        };
        self.graph
            .type_of(storage)
            .and_then(|t| self.types.find(t))
            .or_else(|| self.types.find(&element.type_id))
    }

    fn children<'a>(
        &self,
        instance: InstanceHandle,
        class: &'a ClassDescriptor,
    ) -> Vec<(InstanceHandle, &'a ElementDescriptor)> {
        let Some(data) = self.graph.data(instance) else {
            return Vec::new();
        };
        let slot = |index: usize| {
            class
                .container
                .as_ref()
                .and_then(|c| c.elements.get(index))
        };
        match data {
            Data::Object(fields) => fields.iter().copied().zip(class.elements.iter()).collect(),
            Data::Sequence(items) | Data::Set(items) | Data::Map(items) => match slot(0) {
                Some(element) => items.iter().map(|item| (*item, element)).collect(),
                None => Vec::new(),
            },
            Data::Pair(key, value) => [(*key, slot(0)), (*value, slot(1))]
                .into_iter()
                .filter_map(|(handle, element)| Some((handle, element?)))
                .collect(),
            Data::Primitive(_) | Data::String(_) | Data::Pointer(_) => Vec::new(),
        }
    }

    fn enumerate_node<'a>(
        &'a self,
        instance: InstanceHandle,
        class: &'a ClassDescriptor,
        element: Option<&'a ElementDescriptor>,
        sink: &mut dyn EnumerationSink<'a>,
    ) -> bool
    where
        'r: 'a,
    {
        if sink.begin(instance, class, element) {
            let storage = if element.is_some_and(|e| e.is_pointer) {
                self.follow(instance)
            } else {
                Some(instance)
            };
            for (child, child_element) in storage
                .map(|s| self.children(s, class))
                .unwrap_or_default()
            {
                if child_element.is_pointer && self.follow(child).is_none() {
                    continue;
                }
                let Some(child_class) = self.class_of(child, child_element) else {
                    tracing::warn!(
                        target: "proptree::reflect",
                        type_id = %child_element.type_id,
                        "skipping element of unregistered type"
                    );
                    continue;
                };
                if !self.enumerate_node(child, child_class, Some(child_element), sink) {
                    return false;
                }
            }
        }
        sink.end()
    }

    fn primitive(&self, instance: InstanceHandle) -> Option<Primitive> {
        match self.graph.data(self.follow(instance)?)? {
            Data::Primitive(value) => Some(*value),
            _ => None,
        }
    }
}

impl Introspection for MemoryIntrospection<'_> {
    fn has_edit_metadata(&self) -> bool {
        self.types.has_edit_metadata()
    }

    fn find_class(&self, type_id: &TypeId) -> Option<&ClassDescriptor> {
        self.types.find(type_id)
    }

    fn enumerate<'a>(
        &'a self,
        root: InstanceHandle,
        type_id: &TypeId,
        sink: &mut dyn EnumerationSink<'a>,
    ) -> bool {
        match self.types.find(type_id) {
            Some(class) => self.enumerate_node(root, class, None, sink),
            None => true,
        }
    }

    fn resolve_pointer(&self, instance: InstanceHandle) -> Option<InstanceHandle> {
        self.follow(instance)
    }

    fn value_by_key(
        &self,
        container: InstanceHandle,
        key: InstanceHandle,
    ) -> Option<InstanceHandle> {
        let key_data = self.graph.data(key)?;
        match self.graph.data(container)? {
            Data::Set(keys) => keys
                .iter()
                .copied()
                .find(|k| *k == key || self.graph.data(*k) == Some(key_data)),
            Data::Map(pairs) => pairs.iter().find_map(|pair| match self.graph.data(*pair)? {
                Data::Pair(k, v) if *k == key || self.graph.data(*k) == Some(key_data) => Some(*v),
                _ => None,
            }),
            _ => None,
        }
    }

    fn read_primitive(&self, instance: InstanceHandle, kind: PrimitiveKind) -> Option<Primitive> {
        self.primitive(instance)?.cast(kind)
    }

    fn read_string(&self, instance: InstanceHandle) -> Option<String> {
        match self.graph.data(self.follow(instance)?)? {
            Data::String(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn enum_string(
        &self,
        instance: InstanceHandle,
        enum_type: &TypeId,
        underlying: Option<&TypeId>,
    ) -> Option<String> {
        let descriptor = self.types.find_enum(enum_type)?;
        let kind = underlying
            .and_then(PrimitiveKind::from_type_id)
            .unwrap_or(descriptor.underlying);
        let value = self.primitive(instance)?.cast(kind)?.as_i128()?;
        descriptor.name_of(value).map(|name| name.to_string())
    }

    fn data_to_text(&self, instance: InstanceHandle, type_id: &TypeId) -> Option<String> {
        if !self.types.find(type_id)?.has_serializer {
            return None;
        }
        match self.graph.data(self.follow(instance)?)? {
            Data::Primitive(value) => Some(value.to_text()),
            Data::String(value) => Some(value.clone()),
            _ => None,
        }
    }
}
