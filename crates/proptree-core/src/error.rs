//! Error and diagnostic types for traversal operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::name::TypeId;

/// Errors that prevent a traversal from starting.
///
/// A traversal that fails with one of these has emitted no visitor events.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No introspection context was supplied.
    #[error("No introspection context available")]
    MissingIntrospection,

    /// The introspection context carries no edit metadata.
    #[error("Introspection context has no edit metadata")]
    MissingEditMetadata,

    /// The root type is not known to the introspection context.
    #[error("Unknown type: {type_id}")]
    UnknownType { type_id: TypeId },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Kind of traversal warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// An attribute id has no registered name.
    UnknownAttribute,
    /// A visibility attribute used an encoding that could not be decoded.
    UnreadableVisibility,
    /// A container key could not be turned into a label.
    Stringification,
    /// A primitive handler could not read its value.
    UnreadablePrimitive,
}

/// Non-fatal diagnostic raised during a traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalWarning {
    /// Serialized path of the node the warning refers to.
    pub path: String,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl TraversalWarning {
    /// Create a new traversal warning.
    pub fn new(path: impl Into<String>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create an unknown attribute warning.
    pub fn unknown_attribute(path: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self {
            path: path.into(),
            message: format!("Unable to look up name for attribute id {id}"),
            kind: WarningKind::UnknownAttribute,
        }
    }

    /// Create a stringification warning.
    pub fn stringification(path: impl Into<String>, type_id: &TypeId) -> Self {
        Self {
            path: path.into(),
            message: format!("Unable to stringify key of type {type_id}"),
            kind: WarningKind::Stringification,
        }
    }
}
