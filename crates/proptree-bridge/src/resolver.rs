//! Attribute resolution.
//!
//! Attributes come from three metadata sources, read in precedence order:
//! element edit metadata, element declaration, class declaration. The
//! first value per name wins, except for generic values and enum value
//! keys, which accumulate into a single `GenericValueList`. Attributes that
//! describe children are read from the parent's sources in a second pass.
//! Derived attributes (handler, path, label, description, type, disabled
//! state, container linkage, visibility) are appended last.

use std::collections::HashSet;

use proptree_core::{
    AttributeData, AttributeId, Name, TraversalWarning, TypeId, Value, Visibility, WarningKind,
    names,
};
use proptree_reflect::{Attribute, AttributeRegistry, InstanceHandle};

use crate::frame::Frame;
use crate::report::Diagnostics;
use crate::visibility;

/// Resolve and cache the attributes of `frame`, given its ancestors from
/// the sentinel up to its parent.
///
/// Also assigns the frame's computed visibility and may override its
/// presented type.
pub(crate) fn cache_attributes(
    frame: &mut Frame<'_>,
    ancestors: &[Frame<'_>],
    registry: &AttributeRegistry,
    visit_from_root: bool,
    diagnostics: &mut Diagnostics<'_>,
) {
    let mut collector = Collector {
        registry,
        path: &frame.path,
        visited: HashSet::new(),
        generic_values: Vec::new(),
        handler: None,
        description: None,
        visibility: visibility::initial(ancestors.len(), visit_from_root),
        disable_editor: frame.disable_editor,
        ancestor_disabled: frame.is_ancestor_disabled,
        override_u64: false,
        attributes: Vec::new(),
        diagnostics,
    };

    collector.read_sources(frame, false);
    if let Some(parent) = ancestors.last() {
        collector.read_sources(parent, true);
    }

    let Collector {
        generic_values,
        handler,
        description,
        visibility: local_visibility,
        disable_editor,
        override_u64,
        attributes,
        ..
    } = collector;

    frame.attributes = attributes;
    frame.disable_editor = disable_editor;
    if override_u64 {
        frame.type_id.override_as(TypeId::U64);
    }

    if let Some(parent) = ancestors.last().filter(|p| p.is_container()) {
        push_container_linkage(frame, parent);
    }

    if !generic_values.is_empty() {
        push(frame, names::GENERIC_VALUE_LIST, Value::Array(generic_values));
    }

    let label = label(frame, ancestors);
    if let Some(handler) = handler {
        push(frame, names::HANDLER, handler.as_str());
    }
    let path = frame.path.clone();
    push(frame, names::SERIALIZED_PATH, path);
    if let Some(label) = label.filter(|l| !frame.skip_label && !l.is_empty()) {
        push(frame, names::LABEL, label);
    }
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        push(frame, names::DESCRIPTION, description);
    }
    let value_type = frame.type_id.effective().as_str().to_string();
    push(frame, names::VALUE_TYPE, value_type);
    if frame.disable_editor {
        push(frame, names::DISABLED, true);
    }
    if frame.is_ancestor_disabled {
        push(frame, names::ANCESTOR_DISABLED, true);
    }
    if let Some(class) = frame.class.filter(|_| frame.is_container()) {
        push(frame, names::CONTAINER, class.type_id.as_str());
    }
    if let Some(parent_instance) = frame.parent_instance {
        push(frame, names::PARENT_VALUE, parent_instance);
    }

    let visibility = visibility::compute(local_visibility, frame, ancestors);
    frame.visibility = visibility;
    push(frame, names::VISIBILITY, visibility);
}

/// Merge the parent's `ChangeNotify` into `frame`, parent entries first.
pub(crate) fn inherit_change_notify(frame: &mut Frame<'_>, parent: &Frame<'_>) {
    let Some(inherited) = parent
        .find(&Name::empty(), names::CHANGE_NOTIFY)
        .filter(|v| !v.is_null())
    else {
        return;
    };
    let existing = frame
        .attributes
        .iter_mut()
        .find(|a| a.matches(&Name::empty(), names::CHANGE_NOTIFY));
    match existing {
        Some(existing) => {
            let mut merged = Value::array();
            merged.extend_flat(inherited);
            merged.extend_flat(&existing.value);
            existing.value = merged;
        }
        None => frame
            .attributes
            .push(AttributeData::new(names::CHANGE_NOTIFY, inherited.clone())),
    }
}

/// Display label of `frame`, by precedence.
pub(crate) fn label(frame: &Frame<'_>, ancestors: &[Frame<'_>]) -> Option<String> {
    if let Some(label) = frame.label_override.as_ref().filter(|l| !l.is_empty()) {
        return Some(label.clone());
    }
    if let Some(label) = frame.find(&Name::empty(), names::NAME_LABEL_OVERRIDE) {
        return Some(label.as_str().unwrap_or_default().to_string());
    }
    if let Some(group) = &frame.group {
        return Some(group.clone());
    }
    if let Some(parent) = ancestors.last().filter(|p| p.is_container()) {
        // A map value is indexed by its entry, not by its slot in the pair.
        let index = match ancestors.iter().rev().nth(1) {
            Some(map) if parent.extract_keyed_pair => map.child_element_index,
            _ => parent.child_element_index,
        };
        return Some(format!("[{index}]"));
    }
    if let Some(name) = frame.element.edit_data().and_then(|e| e.name.as_ref()) {
        return Some(name.to_string());
    }
    if frame.element.is_synthetic() {
        return None;
    }

    let class = frame.class?;
    if let Some(name) = class.edit.as_ref().and_then(|e| e.name.as_ref()) {
        return Some(name.to_string());
    }
    if let (Some(element), Some(container)) = (frame.element.descriptor(), &class.container) {
        if !element.name.is_empty() && container.default_element_name() != Some(&element.name) {
            return Some(element.name.to_string());
        }
    }
    (!class.name.is_empty()).then(|| class.name.to_string())
}

fn push(frame: &mut Frame<'_>, name: &str, value: impl Into<Value>) {
    frame.attributes.push(AttributeData::new(name, value));
}

fn push_container_linkage(frame: &mut Frame<'_>, parent: &Frame<'_>) {
    let container = parent
        .parent_container_override
        .clone()
        .or_else(|| parent.class.map(|c| c.type_id.clone()));
    if let Some(container) = container {
        push(frame, names::PARENT_CONTAINER, container.as_str());
    }
    let instance = parent
        .parent_container_instance_override
        .unwrap_or(parent.instance);
    push(frame, names::PARENT_CONTAINER_INSTANCE, instance);
    if let Some(element) = parent.container_element_override {
        push(frame, names::CONTAINER_ELEMENT_OVERRIDE, element);
    }
    if let Some(can_be_modified) = parent.find(&Name::empty(), names::CONTAINER_CAN_BE_MODIFIED) {
        if can_be_modified.as_bool() != Some(true) {
            push(frame, names::PARENT_CONTAINER_CAN_BE_MODIFIED, false);
        }
    }
}

struct Collector<'r, 'd, 'c> {
    registry: &'r AttributeRegistry,
    path: &'r str,
    visited: HashSet<Name>,
    generic_values: Vec<Value>,
    handler: Option<Name>,
    description: Option<String>,
    visibility: Visibility,
    disable_editor: bool,
    ancestor_disabled: bool,
    override_u64: bool,
    attributes: Vec<AttributeData>,
    diagnostics: &'d mut Diagnostics<'c>,
}

impl Collector<'_, '_, '_> {
    /// Read the three metadata sources of `source`. With `is_parent`, only
    /// attributes describing children are taken.
    fn read_sources(&mut self, source: &Frame<'_>, is_parent: bool) {
        if let Some(edit) = source.element.edit_data() {
            if !is_parent {
                if let Some(id) = edit.element_id {
                    self.handler = self.registry.lookup_name(id).cloned();
                }
                if let Some(description) = &edit.description {
                    self.description = Some(description.clone());
                }
            }
            for (id, attribute) in &edit.attributes {
                self.check(*id, attribute, source.parent_instance, is_parent);
            }
        }

        if let Some(element) = source.element.descriptor() {
            for (id, attribute) in &element.attributes {
                self.check(*id, attribute, source.parent_instance, is_parent);
            }
        }

        if let Some(class) = source.class {
            if !is_parent && self.description.as_deref().is_none_or(str::is_empty) {
                if let Some(description) = class.edit.as_ref().and_then(|e| e.description.as_ref()) {
                    self.description = Some(description.clone());
                }
            }
            for (id, attribute) in &class.attributes {
                self.check(*id, attribute, Some(source.instance), is_parent);
            }
        }
    }

    fn check(
        &mut self,
        id: AttributeId,
        attribute: &Attribute,
        instance: Option<InstanceHandle>,
        describes_children: bool,
    ) {
        if attribute.describes_children() != describes_children {
            return;
        }
        let Some(name) = self.registry.lookup_name(id).cloned() else {
            self.diagnostics
                .warn(TraversalWarning::unknown_attribute(self.path, id));
            return;
        };

        if self.visited.contains(&name) && !names::is_multi_valued(name.as_str()) {
            return;
        }
        self.visited.insert(name.clone());

        if name == names::VISIBILITY {
            match attribute.read(instance).as_ref().and_then(Visibility::from_attribute) {
                Some(visibility) => self.visibility = visibility,
                None => self.diagnostics.warn(TraversalWarning::new(
                    self.path,
                    "Unable to decode visibility attribute",
                    WarningKind::UnreadableVisibility,
                )),
            }
            return;
        }

        let Some(value) = self.read(&name, attribute, instance) else {
            return;
        };

        if name == names::READ_ONLY && !self.ancestor_disabled {
            self.disable_editor |= value.as_bool().unwrap_or(false);
        }
        if name == names::HANDLER {
            self.handler = None;
        }
        if name == names::GENERIC_VALUE {
            self.generic_values.push(value);
            return;
        }
        if name == names::ENUM_VALUE_KEY
            && !self.visited.contains(&Name::new(names::ENUM_VALUES))
            && !self.visited.contains(&Name::new(names::GENERIC_VALUE_LIST))
        {
            self.generic_values.push(value);
            self.override_u64 = true;
            return;
        }
        self.attributes.push(AttributeData {
            group: Name::empty(),
            name,
            value,
        });
    }

    /// Registered definitions first, then the generic reader.
    fn read(&self, name: &Name, attribute: &Attribute, instance: Option<InstanceHandle>) -> Option<Value> {
        let mut value = None;
        self.registry.enumerate_registered(name, |definition| {
            value = definition.read(attribute, instance);
            value.is_none()
        });
        value.or_else(|| attribute.read(instance))
    }
}
