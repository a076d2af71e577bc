use thiserror::Error;

use crate::state::PersistenceError;

/// Reasons a command left the document untouched.
///
/// These are not failures: every command is defined for every input, and an
/// `Ignored` outcome simply means "nothing changed, nothing was recorded".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ignored {
    #[error("no element with id {0}")]
    ElementNotFound(String),

    #[error("element {0} is locked")]
    ElementLocked(String),

    #[error("slide index {index} is out of range for {len} slides")]
    SlideOutOfRange { index: usize, len: usize },

    #[error("a presentation must keep at least one slide")]
    LastSlide,

    #[error("there is no current slide")]
    NoCurrentSlide,

    #[error("import data has no slides")]
    MissingSlides,

    #[error("nothing to change")]
    Unchanged,

    #[error("editing is disabled while slides are being generated")]
    Generating,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

/// Errors that can occur in the editor outside of ordinary editing.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Invalid editor configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("A generation is already running")]
    GenerationInProgress,

    #[error("No generation is running")]
    NoGeneration,

    #[error(transparent)]
    Ignored(#[from] Ignored),
}

/// Result type for fallible editor operations
pub type EditorResult<T> = Result<T, EditorError>;
