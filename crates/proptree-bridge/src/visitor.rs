//! The visitor contract.

use proptree_core::{AttributeData, Name, TypeId, Value};
use proptree_reflect::{InstanceHandle, Primitive};

use crate::frame::Frame;

/// What a visitor wants the traversal to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitResponse {
    /// Keep going.
    #[default]
    Continue,
    /// From `visit_object_begin`: do not descend into this object. Its
    /// `visit_object_end` is still delivered.
    Skip,
    /// End the traversal. No further events are delivered.
    Stop,
}

/// Cached attributes of the node being visited.
pub trait Attributes {
    /// Look up an attribute in a group.
    fn find_in(&self, group: &Name, name: &str) -> Option<&Value>;

    /// Look up an attribute in the root group.
    fn find(&self, name: &str) -> Option<&Value> {
        self.find_in(&Name::empty(), name)
    }

    /// Call `callback` with every attribute, in resolution order.
    fn list(&self, callback: &mut dyn FnMut(&AttributeData));
}

/// Identity of the object being visited.
pub trait ObjectAccess {
    /// Presented type.
    fn type_id(&self) -> &TypeId;

    /// Display name of the presented type.
    fn type_name(&self) -> &str;

    /// Instance handle; for group headers, the enclosing object's.
    fn instance(&self) -> InstanceHandle;
}

/// Receiver of traversal events.
///
/// Every `visit_object_begin` is matched by one `visit_object_end` unless
/// the traversal is stopped. Values handled by a primitive or text handler
/// arrive as a single `visit_value` / `visit_text` without begin/end.
pub trait Visitor {
    fn visit_object_begin(
        &mut self,
        access: &dyn ObjectAccess,
        attributes: &dyn Attributes,
    ) -> VisitResponse;

    fn visit_object_end(
        &mut self,
        access: &dyn ObjectAccess,
        attributes: &dyn Attributes,
    ) -> VisitResponse;

    fn visit_value(&mut self, value: Primitive, attributes: &dyn Attributes) -> VisitResponse;

    fn visit_text(&mut self, _text: &str, _attributes: &dyn Attributes) -> VisitResponse {
        VisitResponse::Continue
    }
}

/// A frame as seen by a visitor.
pub(crate) struct FrameView<'f, 'a> {
    pub(crate) frame: &'f Frame<'a>,
    pub(crate) type_name: &'f str,
}

impl Attributes for FrameView<'_, '_> {
    fn find_in(&self, group: &Name, name: &str) -> Option<&Value> {
        self.frame.find(group, name)
    }

    fn list(&self, callback: &mut dyn FnMut(&AttributeData)) {
        self.frame.attributes().iter().for_each(callback);
    }
}

impl ObjectAccess for FrameView<'_, '_> {
    fn type_id(&self) -> &TypeId {
        self.frame.type_id().effective()
    }

    fn type_name(&self) -> &str {
        self.type_name
    }

    fn instance(&self) -> InstanceHandle {
        self.frame.instance()
    }
}
