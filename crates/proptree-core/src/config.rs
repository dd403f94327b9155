//! Traversal configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

const ZERO_WARNING_CAP: &str = "max_warnings must be positive when collecting warnings";

/// Configuration for a traversal.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TraversalConfig {
    /// The traversal starts at the root of the object graph, so the root
    /// object itself is only shown through its children.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub visit_from_root: bool,

    /// Register the built-in primitive handlers (bool, char, integers and
    /// floats).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub primitive_handlers: bool,

    /// Collect warnings into the traversal report.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub collect_warnings: bool,

    /// Maximum number of warnings kept in the report (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_warnings: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl TraversalConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(0)) = self.max_warnings {
            if self.collect_warnings != Some(false) {
                return Err(ZERO_WARNING_CAP.to_string());
            }
        }
        Ok(())
    }
}

impl From<TraversalConfigBuilderError> for BridgeError {
    fn from(err: TraversalConfigBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

impl TraversalConfig {
    /// Create a new config builder.
    pub fn builder() -> TraversalConfigBuilder {
        TraversalConfigBuilder::default()
    }

    /// Check a config that did not go through the builder, such as one read
    /// from a file.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.collect_warnings && self.max_warnings == Some(0) {
            return Err(BridgeError::InvalidConfig {
                message: ZERO_WARNING_CAP.to_string(),
            });
        }
        Ok(())
    }

    /// Whether another warning may be recorded given the current count.
    pub fn accepts_warning(&self, recorded: usize) -> bool {
        self.collect_warnings && self.max_warnings.is_none_or(|max| recorded < max)
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            visit_from_root: true,
            primitive_handlers: true,
            collect_warnings: true,
            max_warnings: None,
        }
    }
}
