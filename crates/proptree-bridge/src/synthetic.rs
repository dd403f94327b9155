//! Storage-less nodes declared by class edit metadata.
//!
//! Group headers and UI elements sit between the fields of a class's edit
//! element list. Each one is queued when its class is entered, keyed by the
//! display name of the field preceding it, and released when that field
//! closes. Elements declared before any field use the empty key and are
//! released when the class's first child is entered.

use proptree_core::Name;
use proptree_reflect::{ClassDescriptor, ElementEditData};

/// A synthetic element waiting for its insertion point.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingElement<'a> {
    /// Display name of the preceding field; empty when leading.
    pub(crate) key: &'a str,
    /// Stack index of the object whose class declared the element.
    pub(crate) owner: usize,
    pub(crate) class: &'a ClassDescriptor,
    pub(crate) edit: &'a ElementEditData,
}

#[derive(Debug, Default)]
pub(crate) struct SyntheticQueue<'a> {
    pending: Vec<PendingElement<'a>>,
}

impl<'a> SyntheticQueue<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue the synthetic elements of `class`, owned by the frame at
    /// stack index `owner`.
    pub(crate) fn scan(&mut self, class: &'a ClassDescriptor, owner: usize) {
        let mut key = "";
        for edit in class.edit_elements() {
            if edit.is_synthetic() {
                self.pending.push(PendingElement {
                    key,
                    owner,
                    class,
                    edit,
                });
            } else {
                key = edit.name.as_ref().map_or("", Name::as_str);
            }
        }
    }

    /// Remove and return the elements released by `key` for `owner`, in
    /// declaration order.
    pub(crate) fn take(&mut self, key: &str, owner: usize) -> Vec<PendingElement<'a>> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.owner == owner && p.key == key);
        self.pending = kept;
        taken
    }

    /// Drop whatever `owner` never released.
    pub(crate) fn discard_owner(&mut self, owner: usize) {
        self.pending.retain(|p| p.owner != owner);
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
