//! Property visibility vocabulary.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::name::AttributeId;
use crate::value::Value;

/// Visibility state of a property node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum Visibility {
    /// Node and its children are shown.
    #[default]
    #[strum(to_string = "Show", serialize = "PropertyVisibility_Show")]
    Show,
    /// The node itself is hidden but its children are shown in its place.
    #[strum(to_string = "ShowChildrenOnly", serialize = "PropertyVisibility_ShowChildrenOnly")]
    ShowChildrenOnly,
    /// Node and its children are hidden.
    #[strum(to_string = "Hide", serialize = "PropertyVisibility_Hide")]
    Hide,
    /// The node is shown, its children are hidden.
    #[strum(to_string = "HideChildren", serialize = "PropertyVisibility_HideChildren")]
    HideChildren,
}

impl Visibility {
    /// Numeric tag used by metadata that encodes visibility as an integer.
    pub fn tag(self) -> AttributeId {
        match self {
            Self::Show => AttributeId::of("PropertyVisibility_Show"),
            Self::ShowChildrenOnly => AttributeId::of("PropertyVisibility_ShowChildrenOnly"),
            Self::Hide => AttributeId::of("PropertyVisibility_Hide"),
            Self::HideChildren => AttributeId::of("PropertyVisibility_HideChildren"),
        }
    }

    /// Look up a visibility by its numeric tag.
    pub fn from_tag(tag: u64) -> Option<Self> {
        Self::iter().find(|v| u64::from(v.tag().0) == tag)
    }

    /// Decode a visibility attribute.
    ///
    /// Three encodings are accepted: a tag (name or numeric id), a 0/1
    /// integer and a boolean. 0 and `false` mean Hide, 1 and `true` mean
    /// Show.
    pub fn from_attribute(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(visible) => Some(if *visible { Self::Show } else { Self::Hide }),
            Value::String(tag) => tag.parse().ok(),
            other => match other.as_u64()? {
                0 => Some(Self::Hide),
                1 => Some(Self::Show),
                tag => Self::from_tag(tag),
            },
        }
    }

    /// Whether this state hides every descendant.
    pub fn hides_descendants(self) -> bool {
        matches!(self, Self::Hide | Self::HideChildren)
    }
}

impl From<Visibility> for Value {
    fn from(visibility: Visibility) -> Self {
        Value::String(visibility.to_string())
    }
}
