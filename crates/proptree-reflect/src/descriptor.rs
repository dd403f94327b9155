//! Reflection metadata: class and element descriptors plus edit metadata.

use std::sync::Arc;

use proptree_core::{AttributeId, Name, TypeId, Value, names};

use crate::attribute::{Attribute, AttributeList};

/// Edit-time metadata of one element of a class.
///
/// Besides real fields, class edit metadata may list elements without
/// storage: named group headers and pure UI elements.
#[derive(Debug, Clone, Default)]
pub struct ElementEditData {
    /// Edit element id: the handler for fields, or the group / UI element
    /// marker. `None` selects the default handler.
    pub element_id: Option<AttributeId>,
    /// Display name.
    pub name: Option<Name>,
    /// Description; for groups this is the group name.
    pub description: Option<String>,
    /// Edit attributes.
    pub attributes: AttributeList,
}

impl ElementEditData {
    /// Edit metadata for a field with a display name.
    pub fn field(name: impl Into<Name>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A named group header.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            element_id: Some(AttributeId::of(names::GROUP)),
            description: Some(name.into()),
            ..Self::default()
        }
    }

    /// A UI element without storage.
    pub fn ui_element() -> Self {
        Self {
            element_id: Some(AttributeId::of(names::UI_ELEMENT)),
            ..Self::default()
        }
    }

    /// Set the handler used to edit this element.
    pub fn with_handler(mut self, handler: &str) -> Self {
        self.element_id = Some(AttributeId::of(handler));
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a constant attribute.
    pub fn with_attribute(self, name: &str, value: impl Into<Value>) -> Self {
        self.with_raw_attribute(name, Attribute::constant(value))
    }

    /// Add a prepared attribute.
    pub fn with_raw_attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.push((AttributeId::of(name), attribute));
        self
    }

    /// Whether this element is a group header.
    pub fn is_group(&self) -> bool {
        self.element_id == Some(AttributeId::of(names::GROUP))
    }

    /// Whether this element is a UI element.
    pub fn is_ui_element(&self) -> bool {
        self.element_id == Some(AttributeId::of(names::UI_ELEMENT))
    }

    /// Whether this element has no backing storage.
    pub fn is_synthetic(&self) -> bool {
        self.is_group() || self.is_ui_element()
    }

    /// Group name, for group headers.
    pub fn group_name(&self) -> Option<&str> {
        if self.is_group() {
            self.description.as_deref().filter(|d| !d.is_empty())
        } else {
            None
        }
    }
}

/// Declaration of one serialized element (field or container slot).
#[derive(Debug, Clone)]
pub struct ElementDescriptor {
    /// Serialized name.
    pub name: Name,
    /// Declared type.
    pub type_id: TypeId,
    /// Declaration attributes.
    pub attributes: AttributeList,
    /// Edit metadata, shared with the owning class's edit element list.
    pub edit: Option<Arc<ElementEditData>>,
    /// The element stores a pointer to its value.
    pub is_pointer: bool,
}

impl ElementDescriptor {
    /// Create an element without edit metadata.
    pub fn new(name: impl Into<Name>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            attributes: AttributeList::new(),
            edit: None,
            is_pointer: false,
        }
    }

    /// Attach edit metadata.
    pub fn with_edit(mut self, edit: ElementEditData) -> Self {
        self.edit = Some(Arc::new(edit));
        self
    }

    /// Add a constant declaration attribute.
    pub fn with_attribute(self, name: &str, value: impl Into<Value>) -> Self {
        self.with_raw_attribute(name, Attribute::constant(value))
    }

    /// Add a prepared declaration attribute.
    pub fn with_raw_attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.push((AttributeId::of(name), attribute));
        self
    }

    /// Mark this element as pointer storage.
    pub fn pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    /// Edit metadata, if any.
    pub fn edit_data(&self) -> Option<&ElementEditData> {
        self.edit.as_deref()
    }
}

/// Edit-time metadata of a class.
#[derive(Debug, Clone, Default)]
pub struct ClassEditData {
    /// Display name.
    pub name: Option<Name>,
    /// Description.
    pub description: Option<String>,
    /// Edit elements in declaration order, including groups and UI elements.
    pub elements: Vec<Arc<ElementEditData>>,
}

/// Kind of container a class represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Ordered elements addressed by index.
    Sequence,
    /// Key-only associative container.
    Set,
    /// Associative container of key/value pairs.
    Map,
    /// A key/value pair, the element of a map.
    Pair,
}

/// Container interface of a class.
#[derive(Debug, Clone)]
pub struct ContainerDescriptor {
    /// Container kind.
    pub kind: ContainerKind,
    /// Element slots: one for sequences, sets and maps, key then value for
    /// pairs.
    pub elements: Vec<ElementDescriptor>,
}

impl ContainerDescriptor {
    /// Whether elements are looked up by key.
    pub fn is_associative(&self) -> bool {
        matches!(self.kind, ContainerKind::Set | ContainerKind::Map)
    }

    /// Name given to elements that have no explicit name.
    pub fn default_element_name(&self) -> Option<&Name> {
        self.elements.first().map(|e| &e.name)
    }
}

/// Declaration of a reflected class.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    /// Type identity.
    pub type_id: TypeId,
    /// Declared name.
    pub name: Name,
    /// Class-level declaration attributes.
    pub attributes: AttributeList,
    /// Serialized elements, in order.
    pub elements: Vec<ElementDescriptor>,
    /// Edit metadata.
    pub edit: Option<ClassEditData>,
    /// Container interface.
    pub container: Option<ContainerDescriptor>,
    /// The class can be rendered to text by its serializer.
    pub has_serializer: bool,
}

impl ClassDescriptor {
    /// Create an empty class descriptor.
    pub fn new(type_id: TypeId, name: impl Into<Name>) -> Self {
        Self {
            type_id,
            name: name.into(),
            attributes: AttributeList::new(),
            elements: Vec::new(),
            edit: None,
            container: None,
            has_serializer: false,
        }
    }

    /// Whether this class is a container.
    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    /// The associative interface, if this class is a set or map.
    pub fn associative(&self) -> Option<&ContainerDescriptor> {
        self.container.as_ref().filter(|c| c.is_associative())
    }

    /// Edit metadata elements, empty without edit metadata.
    pub fn edit_elements(&self) -> &[Arc<ElementEditData>] {
        self.edit.as_ref().map(|e| e.elements.as_slice()).unwrap_or_default()
    }
}
