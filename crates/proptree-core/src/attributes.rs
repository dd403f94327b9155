//! Cached attribute entries and well-known attribute names.

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::value::Value;

/// Well-known attribute names.
pub mod names {
    pub const HANDLER: &str = "Handler";
    pub const LABEL: &str = "Label";
    pub const DESCRIPTION: &str = "Description";
    pub const SERIALIZED_PATH: &str = "SerializedPath";
    pub const VALUE_TYPE: &str = "ValueType";
    pub const VISIBILITY: &str = "Visibility";
    pub const READ_ONLY: &str = "ReadOnly";
    pub const DISABLED: &str = "Disabled";
    pub const ANCESTOR_DISABLED: &str = "AncestorDisabled";
    pub const NAME_LABEL_OVERRIDE: &str = "NameLabelOverride";
    pub const CHANGE_NOTIFY: &str = "ChangeNotify";
    pub const PARENT_VALUE: &str = "ParentValue";

    pub const CONTAINER: &str = "Container";
    pub const PARENT_CONTAINER: &str = "ParentContainer";
    pub const PARENT_CONTAINER_INSTANCE: &str = "ParentContainerInstance";
    pub const PARENT_CONTAINER_CAN_BE_MODIFIED: &str = "ParentContainerCanBeModified";
    pub const CONTAINER_ELEMENT_OVERRIDE: &str = "ContainerElementOverride";
    pub const CONTAINER_CAN_BE_MODIFIED: &str = "ContainerCanBeModified";

    pub const ENUM_TYPE: &str = "EnumType";
    pub const ENUM_UNDERLYING_TYPE: &str = "EnumUnderlyingType";
    pub const ENUM_VALUES: &str = "EnumValues";
    pub const ENUM_VALUE_KEY: &str = "EnumValueKey";
    pub const GENERIC_VALUE: &str = "GenericValue";
    pub const GENERIC_VALUE_LIST: &str = "GenericValueList";

    /// Edit element id of a named group header.
    pub const GROUP: &str = "Group";
    /// Edit element id of a storage-less UI element.
    pub const UI_ELEMENT: &str = "UIElement";

    /// Every well-known name, in declaration order.
    pub const ALL: &[&str] = &[
        HANDLER,
        LABEL,
        DESCRIPTION,
        SERIALIZED_PATH,
        VALUE_TYPE,
        VISIBILITY,
        READ_ONLY,
        DISABLED,
        ANCESTOR_DISABLED,
        NAME_LABEL_OVERRIDE,
        CHANGE_NOTIFY,
        PARENT_VALUE,
        CONTAINER,
        PARENT_CONTAINER,
        PARENT_CONTAINER_INSTANCE,
        PARENT_CONTAINER_CAN_BE_MODIFIED,
        CONTAINER_ELEMENT_OVERRIDE,
        CONTAINER_CAN_BE_MODIFIED,
        ENUM_TYPE,
        ENUM_UNDERLYING_TYPE,
        ENUM_VALUES,
        ENUM_VALUE_KEY,
        GENERIC_VALUE,
        GENERIC_VALUE_LIST,
        GROUP,
        UI_ELEMENT,
    ];

    /// Names that may repeat on one node and are coalesced into a list.
    pub fn is_multi_valued(name: &str) -> bool {
        name == GENERIC_VALUE || name == ENUM_VALUE_KEY
    }
}

/// One resolved attribute of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeData {
    /// Attribute group; empty for the root group.
    pub group: Name,
    /// Attribute name.
    pub name: Name,
    /// Resolved value.
    pub value: Value,
}

impl AttributeData {
    /// Create an attribute in the root group.
    pub fn new(name: impl Into<Name>, value: impl Into<Value>) -> Self {
        Self {
            group: Name::empty(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Check whether this entry matches a group and name.
    pub fn matches(&self, group: &Name, name: &str) -> bool {
        self.group == *group && self.name == name
    }
}
