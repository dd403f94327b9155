//! Scalar values delivered through primitive handlers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use proptree_core::{TypeId, Value};

/// Kind of a primitive scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    Bool,
    Char,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// The type identity of this primitive kind.
    pub fn type_id(self) -> TypeId {
        match self {
            Self::Bool => TypeId::BOOL,
            Self::Char => TypeId::CHAR,
            Self::U8 => TypeId::U8,
            Self::U16 => TypeId::U16,
            Self::U32 => TypeId::U32,
            Self::U64 => TypeId::U64,
            Self::I8 => TypeId::I8,
            Self::I16 => TypeId::I16,
            Self::I32 => TypeId::I32,
            Self::I64 => TypeId::I64,
            Self::F32 => TypeId::F32,
            Self::F64 => TypeId::F64,
        }
    }

    /// Find the primitive kind for a type identity.
    pub fn from_type_id(type_id: &TypeId) -> Option<Self> {
        Self::iter().find(|kind| kind.type_id() == *type_id)
    }

    /// Check if this kind is an integer kind.
    pub fn is_integer(self) -> bool {
        !matches!(self, Self::Bool | Self::Char | Self::F32 | Self::F64)
    }
}

/// A primitive scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Bool(bool),
    Char(char),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Primitive {
    /// The kind of this value.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Char(_) => PrimitiveKind::Char,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
        }
    }

    /// Integer payload widened to `i128`, if this is an integer.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::U8(v) => Some(i128::from(v)),
            Self::U16(v) => Some(i128::from(v)),
            Self::U32(v) => Some(i128::from(v)),
            Self::U64(v) => Some(i128::from(v)),
            Self::I8(v) => Some(i128::from(v)),
            Self::I16(v) => Some(i128::from(v)),
            Self::I32(v) => Some(i128::from(v)),
            Self::I64(v) => Some(i128::from(v)),
            _ => None,
        }
    }

    /// Reinterpret this value as another kind.
    ///
    /// Integers convert between integer kinds when the value fits; every
    /// other kind only converts to itself.
    pub fn cast(self, kind: PrimitiveKind) -> Option<Self> {
        if self.kind() == kind {
            return Some(self);
        }
        let wide = self.as_i128()?;
        let cast = match kind {
            PrimitiveKind::U8 => Self::U8(u8::try_from(wide).ok()?),
            PrimitiveKind::U16 => Self::U16(u16::try_from(wide).ok()?),
            PrimitiveKind::U32 => Self::U32(u32::try_from(wide).ok()?),
            PrimitiveKind::U64 => Self::U64(u64::try_from(wide).ok()?),
            PrimitiveKind::I8 => Self::I8(i8::try_from(wide).ok()?),
            PrimitiveKind::I16 => Self::I16(i16::try_from(wide).ok()?),
            PrimitiveKind::I32 => Self::I32(i32::try_from(wide).ok()?),
            PrimitiveKind::I64 => Self::I64(i64::try_from(wide).ok()?),
            _ => return None,
        };
        Some(cast)
    }

    /// Textual rendering, as used for container key labels.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(v) => v.to_string(),
            Self::Char(v) => v.to_string(),
            Self::F32(v) => v.to_string(),
            Self::F64(v) => v.to_string(),
            other => other.as_i128().map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

impl From<Primitive> for Value {
    fn from(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Bool(v) => Value::Bool(v),
            Primitive::Char(v) => Value::String(v.to_string()),
            Primitive::U8(v) => Value::Uint(u64::from(v)),
            Primitive::U16(v) => Value::Uint(u64::from(v)),
            Primitive::U32(v) => Value::Uint(u64::from(v)),
            Primitive::U64(v) => Value::Uint(v),
            Primitive::I8(v) => Value::Int(i64::from(v)),
            Primitive::I16(v) => Value::Int(i64::from(v)),
            Primitive::I32(v) => Value::Int(i64::from(v)),
            Primitive::I64(v) => Value::Int(v),
            Primitive::F32(v) => Value::Double(f64::from(v)),
            Primitive::F64(v) => Value::Double(v),
        }
    }
}
