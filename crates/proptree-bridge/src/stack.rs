//! The node context stack.

use crate::frame::Frame;

/// Stack of frames, never empty: the bottom entry is a sentinel standing in
/// for the parent of the root object.
#[derive(Debug)]
pub struct FrameStack<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> FrameStack<'a> {
    /// Create a stack holding only `sentinel`.
    pub(crate) fn new(sentinel: Frame<'a>) -> Self {
        Self {
            frames: vec![sentinel],
        }
    }

    /// Number of frames, sentinel included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index the next pushed frame will occupy.
    pub(crate) fn next_index(&self) -> usize {
        self.frames.len()
    }

    /// The innermost frame.
    pub fn top(&self) -> &Frame<'a> {
        // The sentinel is never popped.
        &self.frames[self.frames.len() - 1]
    }

    pub(crate) fn top_mut(&mut self) -> &mut Frame<'a> {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// The frame below the top, if the top is not the sentinel.
    pub fn parent(&self) -> Option<&Frame<'a>> {
        self.frames.len().checked_sub(2).map(|i| &self.frames[i])
    }

    /// Frame at `index` from the bottom.
    pub fn get(&self, index: usize) -> Option<&Frame<'a>> {
        self.frames.get(index)
    }

    /// The top frame mutably, together with every frame below it.
    pub(crate) fn split_top_mut(&mut self) -> Option<(&mut Frame<'a>, &[Frame<'a>])> {
        self.frames
            .split_last_mut()
            .map(|(top, ancestors)| (top, &*ancestors))
    }

    pub(crate) fn push(&mut self, frame: Frame<'a>) {
        self.frames.push(frame);
    }

    /// Pop the top frame. The sentinel stays.
    pub(crate) fn pop(&mut self) -> Option<Frame<'a>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Index of the innermost frame backed by storage. Synthetic group
    /// frames belong to the object below them.
    pub(crate) fn enclosing_object_index(&self) -> usize {
        self.frames
            .iter()
            .rposition(|f| !f.element.is_synthetic())
            .unwrap_or(0)
    }

    /// Frames from the bottom to the top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Frame<'a>> {
        self.frames.iter()
    }
}
