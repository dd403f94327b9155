//! Names, type identities and numeric attribute identifiers.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// An attribute or group name.
///
/// The empty name is valid and denotes the root attribute group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(CompactString);

impl Name {
    /// Create a new name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self(name.into())
    }

    /// The empty name.
    pub const fn empty() -> Self {
        Self(CompactString::const_new(""))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the empty name.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric identifier derived from this name.
    pub fn id(&self) -> AttributeId {
        AttributeId::of(&self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Numeric attribute identifier.
///
/// Metadata declares attributes by identifier only; the attribute registry
/// maps identifiers back to names. The identifier of a name is the first
/// four bytes of its BLAKE3 digest, so it is stable across processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(pub u32);

impl AttributeId {
    /// Derive the identifier for a name.
    pub fn of(name: &str) -> Self {
        let digest = blake3::hash(name.as_bytes());
        let bytes = digest.as_bytes();
        Self(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Identity of a reflected type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(CompactString);

impl TypeId {
    pub const BOOL: TypeId = TypeId::from_static("bool");
    pub const CHAR: TypeId = TypeId::from_static("char");
    pub const U8: TypeId = TypeId::from_static("u8");
    pub const U16: TypeId = TypeId::from_static("u16");
    pub const U32: TypeId = TypeId::from_static("u32");
    pub const U64: TypeId = TypeId::from_static("u64");
    pub const I8: TypeId = TypeId::from_static("i8");
    pub const I16: TypeId = TypeId::from_static("i16");
    pub const I32: TypeId = TypeId::from_static("i32");
    pub const I64: TypeId = TypeId::from_static("i64");
    pub const F32: TypeId = TypeId::from_static("f32");
    pub const F64: TypeId = TypeId::from_static("f64");
    pub const STRING: TypeId = TypeId::from_static("string");

    /// Create a type identity.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Create a type identity from a static string.
    pub const fn from_static(id: &'static str) -> Self {
        Self(CompactString::const_new(id))
    }

    /// Get the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TypeId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
