//! Traversal outcome and diagnostics collection.

use proptree_core::{TraversalConfig, TraversalWarning};
use serde::{Deserialize, Serialize};

/// Summary of one traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalReport {
    /// Number of `visit_object_begin` events.
    pub objects_begun: u64,
    /// Number of `visit_object_end` events.
    pub objects_ended: u64,
    /// Number of `visit_value` and `visit_text` events.
    pub values: u64,
    /// The visitor stopped the traversal early.
    pub stopped: bool,
    /// Warnings raised during the traversal.
    pub warnings: Vec<TraversalWarning>,
    /// Warnings dropped because of the configured cap.
    pub warnings_dropped: u64,
}

impl TraversalReport {
    /// Check if any warnings were raised.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty() || self.warnings_dropped > 0
    }

    /// Whether every begun object was also ended.
    pub fn is_balanced(&self) -> bool {
        self.objects_begun == self.objects_ended
    }
}

/// Routes warnings to the log and, within the configured cap, the report.
pub(crate) struct Diagnostics<'c> {
    config: &'c TraversalConfig,
    warnings: Vec<TraversalWarning>,
    dropped: u64,
}

impl<'c> Diagnostics<'c> {
    pub(crate) fn new(config: &'c TraversalConfig) -> Self {
        Self {
            config,
            warnings: Vec::new(),
            dropped: 0,
        }
    }

    pub(crate) fn warn(&mut self, warning: TraversalWarning) {
        tracing::warn!(
            target: "proptree::bridge",
            path = %warning.path,
            kind = ?warning.kind,
            "{}",
            warning.message
        );
        if self.config.accepts_warning(self.warnings.len()) {
            self.warnings.push(warning);
        } else if self.config.collect_warnings {
            self.dropped += 1;
        }
    }

    pub(crate) fn finish(self, report: &mut TraversalReport) {
        report.warnings = self.warnings;
        report.warnings_dropped = self.dropped;
    }
}
