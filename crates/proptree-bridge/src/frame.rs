//! Per-node traversal state.

use proptree_core::{AttributeData, Name, TypeId, Value, Visibility};
use proptree_reflect::{ClassDescriptor, ElementDescriptor, ElementEditData, InstanceHandle};

/// Where a frame's element metadata comes from.
#[derive(Debug, Clone, Copy, Default)]
pub enum ElementSource<'a> {
    /// The root object or the sentinel.
    #[default]
    None,
    /// A serialized field or container slot.
    Field(&'a ElementDescriptor),
    /// A group header or UI element without storage.
    Synthetic(&'a ElementEditData),
}

impl<'a> ElementSource<'a> {
    /// Edit metadata of the element, if any.
    pub fn edit_data(&self) -> Option<&'a ElementEditData> {
        match *self {
            Self::None => None,
            Self::Field(element) => element.edit_data(),
            Self::Synthetic(edit) => Some(edit),
        }
    }

    /// The serialized element declaration, if any.
    pub fn descriptor(&self) -> Option<&'a ElementDescriptor> {
        match *self {
            Self::Field(element) => Some(element),
            _ => None,
        }
    }

    /// Display name from the edit metadata; empty when there is none.
    pub fn edit_name(&self) -> &'a str {
        self.edit_data()
            .and_then(|edit| edit.name.as_ref())
            .map_or("", Name::as_str)
    }

    /// Whether this is a storage-less element.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }
}

/// The type a frame is presented as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveType {
    /// The declared type.
    Declared(TypeId),
    /// A presentation override of the declared type.
    OverriddenAs { declared: TypeId, effective: TypeId },
}

impl EffectiveType {
    /// The type used for presentation and handler lookup.
    pub fn effective(&self) -> &TypeId {
        match self {
            Self::Declared(type_id) => type_id,
            Self::OverriddenAs { effective, .. } => effective,
        }
    }

    /// The declared type.
    pub fn declared(&self) -> &TypeId {
        match self {
            Self::Declared(type_id) => type_id,
            Self::OverriddenAs { declared, .. } => declared,
        }
    }

    /// Present the frame as `effective`, keeping the declared type.
    pub fn override_as(&mut self, effective: TypeId) {
        let declared = self.declared().clone();
        *self = Self::OverriddenAs { declared, effective };
    }
}

/// One traversal stack entry.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub(crate) instance: InstanceHandle,
    pub(crate) parent_instance: Option<InstanceHandle>,
    pub(crate) type_id: EffectiveType,
    pub(crate) class: Option<&'a ClassDescriptor>,
    pub(crate) element: ElementSource<'a>,
    pub(crate) path: String,
    pub(crate) attributes: Vec<AttributeData>,
    /// Visible children closed so far.
    pub(crate) child_element_index: usize,
    /// Enumerated children closed so far, shown or not.
    pub(crate) child_position: usize,
    pub(crate) visibility: Visibility,

    pub(crate) skip_label: bool,
    pub(crate) label_override: Option<String>,
    pub(crate) disable_editor: bool,
    pub(crate) is_ancestor_disabled: bool,
    /// Name of the group this frame stands for, while it is open.
    pub(crate) group: Option<String>,

    pub(crate) extract_keyed_pair: bool,
    pub(crate) entry_closed: bool,
    pub(crate) parent_container_override: Option<TypeId>,
    pub(crate) parent_container_instance_override: Option<InstanceHandle>,
    pub(crate) container_element_override: Option<InstanceHandle>,

    /// The visitor asked not to see this frame's children.
    pub(crate) skip_children: bool,
    /// Frame is tracked for balance only and never reaches the visitor.
    pub(crate) suppressed: bool,
}

impl<'a> Frame<'a> {
    /// The sentinel below the root object.
    pub(crate) fn sentinel(root: InstanceHandle, root_type: TypeId) -> Self {
        Self::new(root, None, root_type, None, ElementSource::None, String::new())
    }

    pub(crate) fn new(
        instance: InstanceHandle,
        parent_instance: Option<InstanceHandle>,
        type_id: TypeId,
        class: Option<&'a ClassDescriptor>,
        element: ElementSource<'a>,
        path: String,
    ) -> Self {
        Self {
            instance,
            parent_instance,
            type_id: EffectiveType::Declared(type_id),
            class,
            element,
            path,
            attributes: Vec::new(),
            child_element_index: 0,
            child_position: 0,
            visibility: Visibility::Show,
            skip_label: false,
            label_override: None,
            disable_editor: false,
            is_ancestor_disabled: false,
            group: None,
            extract_keyed_pair: false,
            entry_closed: false,
            parent_container_override: None,
            parent_container_instance_override: None,
            container_element_override: None,
            skip_children: false,
            suppressed: false,
        }
    }

    /// Instance this frame refers to.
    pub fn instance(&self) -> InstanceHandle {
        self.instance
    }

    /// Presented type.
    pub fn type_id(&self) -> &EffectiveType {
        &self.type_id
    }

    /// Serialized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Computed visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Resolved attributes, in emission order.
    pub fn attributes(&self) -> &[AttributeData] {
        &self.attributes
    }

    /// Element metadata source.
    pub fn element(&self) -> ElementSource<'a> {
        self.element
    }

    /// Look up a resolved attribute.
    pub fn find(&self, group: &Name, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.matches(group, name))
            .map(|a| &a.value)
    }

    /// Whether the frame stands for a container. Synthetic frames never do.
    pub(crate) fn is_container(&self) -> bool {
        !self.element.is_synthetic() && self.class.is_some_and(ClassDescriptor::is_container)
    }

    /// Whether this frame is an open group header.
    pub(crate) fn is_open_group(&self) -> bool {
        self.group.is_some()
    }

    /// Whether frames pushed above this one must stay invisible.
    pub(crate) fn hides_new_children(&self) -> bool {
        self.suppressed || self.skip_children
    }
}
