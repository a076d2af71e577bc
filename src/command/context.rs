use crate::document::LockedElements;
use crate::element::{ElementId, Position};

/// Read-only editor state a command may consult while computing its result.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Elements that must not be moved or resized
    pub locked: &'a LockedElements,
    /// The currently selected element, if any
    pub selected: Option<&'a ElementId>,
    /// Offset applied to duplicated elements
    pub duplicate_offset: Position,
}

impl<'a> CommandContext<'a> {
    /// Create a new command context
    pub fn new(locked: &'a LockedElements, selected: Option<&'a ElementId>) -> Self {
        Self {
            locked,
            selected,
            duplicate_offset: Position::new(20.0, 20.0),
        }
    }

    pub fn with_duplicate_offset(mut self, offset: Position) -> Self {
        self.duplicate_offset = offset;
        self
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.is_some_and(|selected| selected == id)
    }
}
