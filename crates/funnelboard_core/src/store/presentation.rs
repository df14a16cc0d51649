//! Presentation sequencer: ordered slideshow of views plus a playback cursor.
//!
//! # Invariants
//! - `next`/`previous` are clamped at both ends; there is no wraparound.
//! - The cursor is only reported while it names a view still in the order.

use crate::model::ViewId;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationError {
    EmptyOrder,
    NotInOrder(ViewId),
}

impl Display for PresentationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOrder => write!(f, "presentation order is empty"),
            Self::NotInOrder(view) => write!(f, "view `{view}` is not in the presentation order"),
        }
    }
}

impl Error for PresentationError {}

#[derive(Debug, Clone, Default)]
pub struct PresentationSequencer {
    order: Vec<ViewId>,
    cursor: Option<ViewId>,
    active: bool,
}

impl PresentationSequencer {
    pub fn order(&self) -> &[ViewId] {
        &self.order
    }

    /// Replaces the order wholesale. A cursor pointing outside it is dropped.
    pub fn set_order(&mut self, order: Vec<ViewId>) {
        self.order = order;
        if let Some(cursor) = self.cursor {
            if !self.order.contains(&cursor) {
                self.cursor = None;
            }
        }
    }

    /// Current slide, if the cursor still names a view in the order.
    pub fn current(&self) -> Option<ViewId> {
        self.cursor.filter(|view| self.order.contains(view))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enters playback, placing the cursor on the first slide when unset.
    pub fn begin(&mut self) -> Result<ViewId, PresentationError> {
        let first = *self.order.first().ok_or(PresentationError::EmptyOrder)?;
        let current = match self.current() {
            Some(view) => view,
            None => {
                self.cursor = Some(first);
                first
            }
        };
        self.active = true;
        Ok(current)
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    /// Advances one slide. At the last slide this is a no-op.
    pub fn next(&mut self) -> Option<ViewId> {
        let next_index = match self.position() {
            Some(index) => index + 1,
            None => 0,
        };
        if let Some(view) = self.order.get(next_index) {
            self.cursor = Some(*view);
        }
        self.current()
    }

    /// Steps back one slide. At the first slide (or without a cursor) this is a no-op.
    pub fn previous(&mut self) -> Option<ViewId> {
        if let Some(index) = self.position() {
            if index > 0 {
                self.cursor = Some(self.order[index - 1]);
            }
        }
        self.current()
    }

    /// Moves the cursor straight to `view`.
    pub fn jump_to(&mut self, view: ViewId) -> Result<(), PresentationError> {
        if !self.order.contains(&view) {
            return Err(PresentationError::NotInOrder(view));
        }
        self.cursor = Some(view);
        Ok(())
    }

    fn position(&self) -> Option<usize> {
        let cursor = self.cursor?;
        self.order.iter().position(|view| *view == cursor)
    }
}
