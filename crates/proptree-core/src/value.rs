//! Generic document value used for attribute payloads and visitor output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered object map used by [`Value::Object`].
pub type Object = IndexMap<String, Value>;

/// A tagged document tree.
///
/// This is the representation every cached attribute is converted to before
/// it reaches a visitor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null / absent value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer value.
    Int(i64),

    /// Unsigned integer value.
    Uint(u64),

    /// Floating point value.
    Double(f64),

    /// String value.
    String(String),

    /// Array value.
    Array(Vec<Value>),

    /// Object value, insertion ordered.
    Object(Object),
}

impl Value {
    /// Create an empty array value.
    pub fn array() -> Self {
        Self::Array(Vec::new())
    }

    /// Create an empty object value.
    pub fn object() -> Self {
        Self::Object(Object::new())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a signed integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Try to get this value as an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(u) => Some(*u),
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Try to get this value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            Self::Uint(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Append to an array value, converting a non-array value into a
    /// one-element array holding the previous value first.
    pub fn push(&mut self, value: Value) {
        match self {
            Self::Array(arr) => arr.push(value),
            Self::Null => *self = Self::Array(vec![value]),
            other => {
                let previous = std::mem::take(other);
                *other = Self::Array(vec![previous, value]);
            }
        }
    }

    /// Append `source` to `self`, flattening `source` if it is an array.
    pub fn extend_flat(&mut self, source: &Value) {
        match source {
            Self::Array(items) => {
                for item in items {
                    self.push(item.clone());
                }
            }
            other => self.push(other.clone()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Self::Uint(u64::from(u))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Double(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Double(f64::from(f))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(arr: Vec<T>) -> Self {
        Self::Array(arr.into_iter().map(Into::into).collect())
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::Uint(u)
                } else {
                    Self::Double(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
