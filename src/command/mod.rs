mod commands;
mod context;
mod history;

use crate::document::Presentation;
use crate::element::ElementId;
use crate::error::Ignored;

pub use commands::{Command, ImportData};
pub use context::CommandContext;
pub use history::{History, Snapshot};

/// Result type for command application
pub type CommandResult = Result<Applied, Ignored>;

/// How a committed command affects the element selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// Leave the selection as it is
    Keep,
    /// Select this element once the document is committed
    Select(ElementId),
    /// Drop the selection and leave edit mode
    Clear,
}

/// The outcome of a command that changed the document
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// The document to commit
    pub document: Presentation,
    pub selection: SelectionChange,
    /// Enter edit mode on the newly selected element
    pub start_editing: bool,
}

impl Applied {
    pub fn new(document: Presentation, selection: SelectionChange) -> Self {
        Self {
            document,
            selection,
            start_editing: false,
        }
    }

    pub fn keep(document: Presentation) -> Self {
        Self::new(document, SelectionChange::Keep)
    }

    pub fn editing(mut self) -> Self {
        self.start_editing = true;
        self
    }
}
