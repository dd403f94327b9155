//! Opaque references into an externally owned object graph.

use std::fmt;

use proptree_core::Value;
use serde::{Deserialize, Serialize};

/// Handle to one instance (object, field or container element) owned by an
/// introspection context.
///
/// Handles are plain indices: they carry no ownership and are only
/// meaningful to the context that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceHandle(u32);

impl InstanceHandle {
    /// Create a handle from a raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<InstanceHandle> for Value {
    fn from(handle: InstanceHandle) -> Self {
        Value::Uint(u64::from(handle.0))
    }
}
