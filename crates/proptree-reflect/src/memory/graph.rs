//! Object storage for the in-memory introspection context.

use proptree_core::TypeId;

use crate::handle::InstanceHandle;
use crate::primitive::Primitive;

/// Storage of one instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// A primitive scalar, also used for enumerated values.
    Primitive(Primitive),
    /// A built-in string.
    String(String),
    /// A class instance; one handle per class element, in element order.
    Object(Vec<InstanceHandle>),
    /// Sequence elements.
    Sequence(Vec<InstanceHandle>),
    /// Set keys.
    Set(Vec<InstanceHandle>),
    /// Map entries; each handle refers to a [`Data::Pair`].
    Map(Vec<InstanceHandle>),
    /// A key/value pair.
    Pair(InstanceHandle, InstanceHandle),
    /// Pointer storage.
    Pointer(Option<InstanceHandle>),
}

/// One instance and its runtime type.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub type_id: TypeId,
    pub data: Data,
}

/// Arena of instances addressed by [`InstanceHandle`].
#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
    instances: Vec<Instance>,
}

impl ObjectGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance of any shape.
    pub fn insert(&mut self, type_id: TypeId, data: Data) -> InstanceHandle {
        let index = u32::try_from(self.instances.len()).unwrap_or(u32::MAX);
        self.instances.push(Instance { type_id, data });
        InstanceHandle::new(index)
    }

    /// Add a primitive typed by its kind.
    pub fn primitive(&mut self, value: Primitive) -> InstanceHandle {
        self.insert(value.kind().type_id(), Data::Primitive(value))
    }

    /// Add a string.
    pub fn string(&mut self, value: impl Into<String>) -> InstanceHandle {
        self.insert(TypeId::STRING, Data::String(value.into()))
    }

    /// Add a value of an enumerated type.
    pub fn enum_value(&mut self, type_id: TypeId, value: Primitive) -> InstanceHandle {
        self.insert(type_id, Data::Primitive(value))
    }

    /// Add a class instance.
    pub fn object(&mut self, type_id: TypeId, fields: Vec<InstanceHandle>) -> InstanceHandle {
        self.insert(type_id, Data::Object(fields))
    }

    /// Add a sequence.
    pub fn sequence(&mut self, type_id: TypeId, items: Vec<InstanceHandle>) -> InstanceHandle {
        self.insert(type_id, Data::Sequence(items))
    }

    /// Add a set.
    pub fn set(&mut self, type_id: TypeId, keys: Vec<InstanceHandle>) -> InstanceHandle {
        self.insert(type_id, Data::Set(keys))
    }

    /// Add a map whose pairs are typed `pair_type`.
    pub fn map(
        &mut self,
        type_id: TypeId,
        pair_type: TypeId,
        entries: Vec<(InstanceHandle, InstanceHandle)>,
    ) -> InstanceHandle {
        let pairs = entries
            .into_iter()
            .map(|(key, value)| self.insert(pair_type.clone(), Data::Pair(key, value)))
            .collect();
        self.insert(type_id, Data::Map(pairs))
    }

    /// Add pointer storage.
    pub fn pointer(&mut self, type_id: TypeId, target: Option<InstanceHandle>) -> InstanceHandle {
        self.insert(type_id, Data::Pointer(target))
    }

    /// Look up an instance.
    pub fn get(&self, handle: InstanceHandle) -> Option<&Instance> {
        self.instances.get(handle.index())
    }

    /// Storage of an instance.
    pub fn data(&self, handle: InstanceHandle) -> Option<&Data> {
        self.get(handle).map(|i| &i.data)
    }

    /// Runtime type of an instance.
    pub fn type_of(&self, handle: InstanceHandle) -> Option<&TypeId> {
        self.get(handle).map(|i| &i.type_id)
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
