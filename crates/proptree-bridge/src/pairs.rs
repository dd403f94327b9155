//! Associative container entries.
//!
//! Elements of a set are shown as plain read-only rows. Elements of a map
//! are key/value pairs: the pair itself never reaches the visitor, its key
//! becomes the label of its value, and the value is shown as a row of the
//! map.

use proptree_core::{AttributeId, TypeId, names};
use proptree_reflect::{AttributeList, ClassDescriptor, ElementDescriptor, InstanceHandle, Introspection};

use crate::frame::Frame;

/// Role of an element inside an associative container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PairRole {
    /// The element is its own key.
    SetElement,
    /// The element is a key/value pair.
    KeyedPair,
}

/// Role of `instance` (of class `class`) under `parent`, if `parent` is an
/// associative container.
pub(crate) fn classify(
    introspection: &dyn Introspection,
    parent: &Frame<'_>,
    instance: InstanceHandle,
    class: &ClassDescriptor,
) -> Option<PairRole> {
    parent.class?.associative()?;
    if introspection.value_by_key(parent.instance, instance) == Some(instance) {
        Some(PairRole::SetElement)
    } else if class.is_container() {
        Some(PairRole::KeyedPair)
    } else {
        None
    }
}

/// Apply `role` to a frame about to be pushed under `parent`.
pub(crate) fn apply(role: PairRole, frame: &mut Frame<'_>, parent: &Frame<'_>) {
    match role {
        PairRole::SetElement => {
            frame.skip_label = true;
            frame.disable_editor = true;
        }
        PairRole::KeyedPair => {
            frame.extract_keyed_pair = true;
            frame.entry_closed = true;
            frame.parent_container_override = parent.class.map(|c| c.type_id.clone());
            frame.parent_container_instance_override = Some(parent.instance);
            frame.container_element_override = Some(frame.instance);
        }
    }
}

/// Render a pair key as text.
///
/// Tries, in order: the enumerated value name, the built-in string, and
/// the type's text serializer.
pub(crate) fn stringify_key(
    introspection: &dyn Introspection,
    instance: InstanceHandle,
    class: &ClassDescriptor,
    element: Option<&ElementDescriptor>,
) -> Option<String> {
    enum_key(introspection, instance, class, element)
        .or_else(|| {
            (class.type_id == TypeId::STRING)
                .then(|| introspection.read_string(instance))
                .flatten()
        })
        .or_else(|| {
            element?;
            introspection.data_to_text(instance, &class.type_id)
        })
}

fn enum_key(
    introspection: &dyn Introspection,
    instance: InstanceHandle,
    class: &ClassDescriptor,
    element: Option<&ElementDescriptor>,
) -> Option<String> {
    let enum_type = read_type(&element?.attributes, names::ENUM_TYPE, None)?;
    let underlying = read_type(&class.attributes, names::ENUM_UNDERLYING_TYPE, Some(instance))?;
    introspection.enum_string(instance, &enum_type, Some(&underlying))
}

fn read_type(attributes: &AttributeList, name: &str, instance: Option<InstanceHandle>) -> Option<TypeId> {
    let id = AttributeId::of(name);
    let (_, attribute) = attributes.iter().find(|(candidate, _)| *candidate == id)?;
    attribute.read(instance)?.as_str().map(TypeId::new)
}
