//! Raw attribute metadata as declared on classes and elements.

use std::fmt;
use std::sync::Arc;

use proptree_core::{AttributeId, Value};

use crate::handle::InstanceHandle;

/// Reader bound to an instance, for attributes whose value depends on the
/// object they are read from.
pub type InstanceReader = Arc<dyn Fn(InstanceHandle) -> Option<Value> + Send + Sync>;

/// How an attribute produces its value.
#[derive(Clone)]
pub enum AttributeValue {
    /// A fixed value.
    Constant(Value),
    /// A value computed from the owning instance.
    Bound(InstanceReader),
}

/// One raw attribute.
#[derive(Clone)]
pub struct Attribute {
    value: AttributeValue,
    describes_children: bool,
}

/// Attributes keyed by numeric id, in declaration order.
pub type AttributeList = Vec<(AttributeId, Attribute)>;

impl Attribute {
    /// Create a constant attribute.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self {
            value: AttributeValue::Constant(value.into()),
            describes_children: false,
        }
    }

    /// Create an attribute read from the owning instance.
    pub fn bound(reader: impl Fn(InstanceHandle) -> Option<Value> + Send + Sync + 'static) -> Self {
        Self {
            value: AttributeValue::Bound(Arc::new(reader)),
            describes_children: false,
        }
    }

    /// Mark this attribute as describing the children of the node it is
    /// declared on rather than the node itself.
    pub fn describing_children(mut self) -> Self {
        self.describes_children = true;
        self
    }

    /// Whether this attribute describes children.
    pub fn describes_children(&self) -> bool {
        self.describes_children
    }

    /// The underlying value source.
    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    /// Generic read. Null results are reported as `None`.
    pub fn read(&self, instance: Option<InstanceHandle>) -> Option<Value> {
        let value = match &self.value {
            AttributeValue::Constant(value) => value.clone(),
            AttributeValue::Bound(reader) => reader(instance?)?,
        };
        (!value.is_null()).then_some(value)
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Attribute");
        match &self.value {
            AttributeValue::Constant(value) => s.field("value", value),
            AttributeValue::Bound(_) => s.field("value", &"<bound>"),
        };
        s.field("describes_children", &self.describes_children).finish()
    }
}
