//! Visibility computation.
//!
//! A node starts from its local visibility (the default, or an explicit
//! visibility attribute). Fields without edit metadata outside of containers
//! only contribute their children. A hiding ancestor overrides everything.

use proptree_core::Visibility;

use crate::frame::{ElementSource, Frame};

/// Visibility a node starts from before any attribute is read.
pub(crate) fn initial(depth: usize, visit_from_root: bool) -> Visibility {
    // depth 1 is the root object, directly above the sentinel.
    if depth == 1 && visit_from_root {
        Visibility::ShowChildrenOnly
    } else {
        Visibility::Show
    }
}

/// Final visibility of `frame` given its local visibility and its ancestors
/// (sentinel first, parent last).
pub(crate) fn compute(local: Visibility, frame: &Frame<'_>, ancestors: &[Frame<'_>]) -> Visibility {
    let mut visibility = local;

    let parent_is_container = ancestors.last().is_some_and(Frame::is_container);
    if let ElementSource::Field(element) = frame.element {
        if element.edit.is_none() && !parent_is_container {
            visibility = Visibility::ShowChildrenOnly;
        }
    }

    if ancestors.iter().any(|a| a.visibility.hides_descendants()) {
        visibility = Visibility::Hide;
    }
    visibility
}
