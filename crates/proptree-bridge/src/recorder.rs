//! A visitor that records every event.

use proptree_core::{AttributeData, TypeId, Value, Visibility, names};
use proptree_reflect::Primitive;
use serde::{Deserialize, Serialize};

use crate::visitor::{Attributes, ObjectAccess, VisitResponse, Visitor};

/// Kind of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Begin,
    End,
    Value,
    Text,
}

/// One recorded visitor event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitEvent {
    /// Event kind.
    pub kind: EventKind,
    /// Nesting depth; a begin and its end share the same depth.
    pub depth: usize,
    /// Presented type, for begin and end events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<TypeId>,
    /// Delivered value, for value and text events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Cached attributes at the time of the event.
    pub attributes: Vec<AttributeData>,
}

impl VisitEvent {
    /// Look up a root group attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.group.is_empty() && a.name == name)
            .map(|a| &a.value)
    }

    /// The `SerializedPath` attribute.
    pub fn path(&self) -> Option<&str> {
        self.attribute(names::SERIALIZED_PATH).and_then(Value::as_str)
    }

    /// The `Label` attribute.
    pub fn label(&self) -> Option<&str> {
        self.attribute(names::LABEL).and_then(Value::as_str)
    }

    /// The decoded `Visibility` attribute.
    pub fn visibility(&self) -> Option<Visibility> {
        self.attribute(names::VISIBILITY)
            .and_then(Visibility::from_attribute)
    }
}

/// Records events in order, optionally skipping subtrees by path or
/// stopping after a number of events.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Vec<VisitEvent>,
    depth: usize,
    skip_paths: Vec<String>,
    stop_after: Option<usize>,
}

impl Recorder {
    /// Create a recorder that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `Skip` when an object with this serialized path begins.
    pub fn skip_path(mut self, path: impl Into<String>) -> Self {
        self.skip_paths.push(path.into());
        self
    }

    /// Answer `Stop` once `count` events have been recorded.
    pub fn stop_after(mut self, count: usize) -> Self {
        self.stop_after = Some(count);
        self
    }

    /// Recorded events.
    pub fn events(&self) -> &[VisitEvent] {
        &self.events
    }

    /// Take the recorded events.
    pub fn into_events(self) -> Vec<VisitEvent> {
        self.events
    }

    fn record(
        &mut self,
        kind: EventKind,
        type_id: Option<TypeId>,
        value: Option<Value>,
        attributes: &dyn Attributes,
    ) -> VisitResponse {
        let mut cached = Vec::new();
        attributes.list(&mut |a| cached.push(a.clone()));
        self.events.push(VisitEvent {
            kind,
            depth: self.depth,
            type_id,
            value,
            attributes: cached,
        });

        if self.stop_after.is_some_and(|count| self.events.len() >= count) {
            VisitResponse::Stop
        } else {
            VisitResponse::Continue
        }
    }
}

impl Visitor for Recorder {
    fn visit_object_begin(
        &mut self,
        access: &dyn ObjectAccess,
        attributes: &dyn Attributes,
    ) -> VisitResponse {
        let response = self.record(
            EventKind::Begin,
            Some(access.type_id().clone()),
            None,
            attributes,
        );
        self.depth += 1;
        let skipped = attributes
            .find(names::SERIALIZED_PATH)
            .and_then(Value::as_str)
            .is_some_and(|path| self.skip_paths.iter().any(|p| p == path));
        if skipped && response == VisitResponse::Continue {
            VisitResponse::Skip
        } else {
            response
        }
    }

    fn visit_object_end(
        &mut self,
        access: &dyn ObjectAccess,
        attributes: &dyn Attributes,
    ) -> VisitResponse {
        self.depth = self.depth.saturating_sub(1);
        self.record(EventKind::End, Some(access.type_id().clone()), None, attributes)
    }

    fn visit_value(&mut self, value: Primitive, attributes: &dyn Attributes) -> VisitResponse {
        self.record(EventKind::Value, None, Some(value.into()), attributes)
    }

    fn visit_text(&mut self, text: &str, attributes: &dyn Attributes) -> VisitResponse {
        self.record(EventKind::Text, None, Some(Value::from(text)), attributes)
    }
}
