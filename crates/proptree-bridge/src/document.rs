//! A visitor that builds a nested property document.
//!
//! Every shown node becomes a row object; nodes shown only through their
//! children are left out and their children are attached to the nearest
//! shown ancestor. Hidden subtrees are skipped.

use proptree_core::{Object, Value, Visibility, names};
use proptree_reflect::Primitive;

use crate::visitor::{Attributes, ObjectAccess, VisitResponse, Visitor};

#[derive(Debug)]
enum Open {
    Row { row: Object, children: Vec<Value> },
    Transparent,
    Hidden,
}

/// Builds an array of row objects with `label`, `path`, `type`, `value`,
/// `disabled`, `description` and `children` fields.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    open: Vec<Open>,
    rows: Vec<Value>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed top-level rows.
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// The finished document.
    pub fn into_document(self) -> Value {
        Value::Array(self.rows)
    }

    fn attach(&mut self, row: Value) {
        let parent = self.open.iter_mut().rev().find_map(|open| match open {
            Open::Row { children, .. } => Some(children),
            _ => None,
        });
        match parent {
            Some(children) => children.push(row),
            None => self.rows.push(row),
        }
    }
}

fn visibility(attributes: &dyn Attributes) -> Visibility {
    attributes
        .find(names::VISIBILITY)
        .and_then(Visibility::from_attribute)
        .unwrap_or_default()
}

fn row(attributes: &dyn Attributes) -> Object {
    let mut row = Object::new();
    if let Some(label) = attributes.find(names::LABEL) {
        row.insert("label".to_string(), label.clone());
    }
    if let Some(path) = attributes.find(names::SERIALIZED_PATH) {
        row.insert("path".to_string(), path.clone());
    }
    if let Some(value_type) = attributes.find(names::VALUE_TYPE) {
        row.insert("type".to_string(), value_type.clone());
    }
    let disabled = [names::DISABLED, names::ANCESTOR_DISABLED]
        .into_iter()
        .any(|name| attributes.find(name).and_then(Value::as_bool) == Some(true));
    if disabled {
        row.insert("disabled".to_string(), Value::Bool(true));
    }
    if let Some(description) = attributes.find(names::DESCRIPTION) {
        row.insert("description".to_string(), description.clone());
    }
    row
}

impl Visitor for DocumentBuilder {
    fn visit_object_begin(
        &mut self,
        _access: &dyn ObjectAccess,
        attributes: &dyn Attributes,
    ) -> VisitResponse {
        let (open, response) = match visibility(attributes) {
            Visibility::Hide => (Open::Hidden, VisitResponse::Skip),
            Visibility::ShowChildrenOnly => (Open::Transparent, VisitResponse::Continue),
            Visibility::Show => (
                Open::Row {
                    row: row(attributes),
                    children: Vec::new(),
                },
                VisitResponse::Continue,
            ),
            Visibility::HideChildren => (
                Open::Row {
                    row: row(attributes),
                    children: Vec::new(),
                },
                VisitResponse::Skip,
            ),
        };
        self.open.push(open);
        response
    }

    fn visit_object_end(
        &mut self,
        _access: &dyn ObjectAccess,
        _attributes: &dyn Attributes,
    ) -> VisitResponse {
        if let Some(Open::Row { mut row, children }) = self.open.pop() {
            row.insert("children".to_string(), Value::Array(children));
            self.attach(Value::Object(row));
        }
        VisitResponse::Continue
    }

    fn visit_value(&mut self, value: Primitive, attributes: &dyn Attributes) -> VisitResponse {
        if matches!(visibility(attributes), Visibility::Show | Visibility::HideChildren) {
            let mut row = row(attributes);
            row.insert("value".to_string(), value.into());
            self.attach(Value::Object(row));
        }
        VisitResponse::Continue
    }

    fn visit_text(&mut self, text: &str, attributes: &dyn Attributes) -> VisitResponse {
        if matches!(visibility(attributes), Visibility::Show | Visibility::HideChildren) {
            let mut row = row(attributes);
            row.insert("value".to_string(), Value::from(text));
            self.attach(Value::Object(row));
        }
        VisitResponse::Continue
    }
}
