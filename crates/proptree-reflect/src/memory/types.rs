//! Type registration for the in-memory introspection context.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use proptree_core::{AttributeId, Name, TypeId, Value, names};
use strum::IntoEnumIterator;

use crate::attribute::Attribute;
use crate::descriptor::{
    ClassDescriptor, ClassEditData, ContainerDescriptor, ContainerKind, ElementDescriptor,
    ElementEditData,
};
use crate::primitive::PrimitiveKind;

/// Named values of an enumerated type.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    /// Storage kind of the values.
    pub underlying: PrimitiveKind,
    /// Value names, in declaration order.
    pub values: Vec<(Name, i64)>,
}

impl EnumDescriptor {
    /// Name of the given value, if declared.
    pub fn name_of(&self, value: i128) -> Option<&Name> {
        self.values
            .iter()
            .find(|(_, v)| i128::from(*v) == value)
            .map(|(name, _)| name)
    }
}

/// Set of reflected classes known to a [`MemoryIntrospection`](super::MemoryIntrospection).
///
/// A new registry already knows every primitive kind and the built-in string
/// type.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    classes: IndexMap<TypeId, ClassDescriptor>,
    enums: HashMap<TypeId, EnumDescriptor>,
    edit_metadata: bool,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry with the built-in types.
    pub fn new() -> Self {
        let mut registry = Self {
            classes: IndexMap::new(),
            enums: HashMap::new(),
            edit_metadata: true,
        };
        for kind in PrimitiveKind::iter() {
            let mut class = ClassDescriptor::new(kind.type_id(), kind.to_string());
            class.has_serializer = true;
            registry.insert(class);
        }
        let mut string = ClassDescriptor::new(TypeId::STRING, "string");
        string.has_serializer = true;
        registry.insert(string);
        registry
    }

    /// Drop edit metadata support, as for a runtime without editor
    /// reflection.
    pub fn without_edit_metadata(mut self) -> Self {
        self.edit_metadata = false;
        self
    }

    /// Whether edit metadata is available.
    pub fn has_edit_metadata(&self) -> bool {
        self.edit_metadata
    }

    /// Register a fully built class, replacing any previous registration.
    pub fn register(&mut self, class: ClassDescriptor) -> TypeId {
        tracing::debug!(target: "proptree::reflect", type_id = %class.type_id, "registered class");
        self.insert(class)
    }

    fn insert(&mut self, class: ClassDescriptor) -> TypeId {
        let type_id = class.type_id.clone();
        self.classes.insert(type_id.clone(), class);
        type_id
    }

    /// Start building a class.
    pub fn class(&mut self, type_id: impl Into<TypeId>, name: impl Into<Name>) -> ClassBuilder<'_> {
        ClassBuilder {
            registry: self,
            class: ClassDescriptor::new(type_id.into(), name),
        }
    }

    /// Register a sequence container of `element` values.
    pub fn sequence(&mut self, type_id: impl Into<TypeId>, element: TypeId) -> TypeId {
        self.container(type_id.into(), ContainerKind::Sequence, vec![
            ElementDescriptor::new("element", element),
        ])
    }

    /// Register a set container of `element` keys.
    pub fn set(&mut self, type_id: impl Into<TypeId>, element: TypeId) -> TypeId {
        self.container(type_id.into(), ContainerKind::Set, vec![
            ElementDescriptor::new("element", element),
        ])
    }

    /// Register a map container together with its pair class.
    ///
    /// The pair class is registered as `<type_id>::pair` and holds the key
    /// as `value1` and the value as `value2`. Keys of a registered
    /// enumerated type are tagged with their enum type.
    pub fn map(&mut self, type_id: impl Into<TypeId>, key: TypeId, value: TypeId) -> TypeId {
        let type_id = type_id.into();
        let mut key_element = ElementDescriptor::new("value1", key.clone());
        if self.enums.contains_key(&key) {
            key_element = key_element.with_attribute(names::ENUM_TYPE, key.as_str());
        }
        let pair = self.container(
            Self::pair_type(&type_id),
            ContainerKind::Pair,
            vec![key_element, ElementDescriptor::new("value2", value)],
        );
        self.container(type_id, ContainerKind::Map, vec![ElementDescriptor::new("element", pair)])
    }

    /// Type id of the pair class of a map.
    pub fn pair_type(map: &TypeId) -> TypeId {
        TypeId::new(format!("{map}::pair"))
    }

    fn container(
        &mut self,
        type_id: TypeId,
        kind: ContainerKind,
        elements: Vec<ElementDescriptor>,
    ) -> TypeId {
        let mut class = ClassDescriptor::new(type_id.clone(), type_id.as_str());
        class.container = Some(ContainerDescriptor { kind, elements });
        self.register(class)
    }

    /// Register an enumerated type stored as `underlying`.
    ///
    /// The class carries its underlying type and one value key per declared
    /// value, as `[value, name]`.
    pub fn enumeration(
        &mut self,
        type_id: impl Into<TypeId>,
        name: impl Into<Name>,
        underlying: PrimitiveKind,
        values: &[(&str, i64)],
    ) -> TypeId {
        let type_id = type_id.into();
        let mut class = ClassDescriptor::new(type_id.clone(), name);
        class.has_serializer = true;
        class.attributes.push((
            AttributeId::of(names::ENUM_UNDERLYING_TYPE),
            Attribute::constant(underlying.type_id().as_str()),
        ));
        for (value_name, value) in values {
            class.attributes.push((
                AttributeId::of(names::ENUM_VALUE_KEY),
                Attribute::constant(vec![Value::Int(*value), Value::from(*value_name)]),
            ));
        }
        self.enums.insert(type_id.clone(), EnumDescriptor {
            underlying,
            values: values.iter().map(|(n, v)| (Name::new(*n), *v)).collect(),
        });
        self.register(class)
    }

    /// Look up a class.
    pub fn find(&self, type_id: &TypeId) -> Option<&ClassDescriptor> {
        self.classes.get(type_id)
    }

    /// Look up an enumerated type.
    pub fn find_enum(&self, type_id: &TypeId) -> Option<&EnumDescriptor> {
        self.enums.get(type_id)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no classes are registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Builder for one class, returned by [`TypeRegistry::class`].
#[derive(Debug)]
pub struct ClassBuilder<'r> {
    registry: &'r mut TypeRegistry,
    class: ClassDescriptor,
}

impl ClassBuilder<'_> {
    fn edit_data(&mut self) -> &mut ClassEditData {
        self.class.edit.get_or_insert_with(ClassEditData::default)
    }

    /// Add a constant class attribute.
    pub fn attribute(self, name: &str, value: impl Into<Value>) -> Self {
        self.raw_attribute(name, Attribute::constant(value))
    }

    /// Add a prepared class attribute.
    pub fn raw_attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.class.attributes.push((AttributeId::of(name), attribute));
        self
    }

    /// Give the class edit metadata with a display name.
    pub fn edit(mut self, name: impl Into<Name>) -> Self {
        self.edit_data().name = Some(name.into());
        self
    }

    /// Set the class edit description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.edit_data().description = Some(description.into());
        self
    }

    /// Add a field without edit metadata.
    pub fn field(self, name: &str, type_id: TypeId) -> Self {
        self.element(ElementDescriptor::new(name, type_id))
    }

    /// Add a field shown under `label`.
    pub fn edited_field(self, name: &str, type_id: TypeId, label: &str) -> Self {
        self.element(ElementDescriptor::new(name, type_id).with_edit(ElementEditData::field(label)))
    }

    /// Add a prepared element. Its edit metadata, if any, joins the class
    /// edit element list at the current position.
    pub fn element(mut self, element: ElementDescriptor) -> Self {
        if let Some(edit) = &element.edit {
            let edit = Arc::clone(edit);
            self.edit_data().elements.push(edit);
        }
        self.class.elements.push(element);
        self
    }

    /// Open a named group at the current position.
    pub fn group(self, name: impl Into<String>) -> Self {
        self.synthetic(ElementEditData::group(name))
    }

    /// Add a UI element at the current position.
    pub fn ui_element(self, edit: ElementEditData) -> Self {
        self.synthetic(edit)
    }

    fn synthetic(mut self, edit: ElementEditData) -> Self {
        self.edit_data().elements.push(Arc::new(edit));
        self
    }

    /// Mark the class as text-serializable.
    pub fn serializer(mut self) -> Self {
        self.class.has_serializer = true;
        self
    }

    /// Register the class.
    pub fn register(self) -> TypeId {
        self.registry.register(self.class)
    }
}
