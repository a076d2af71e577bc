use crate::element::ElementId;
use crate::state::EditorState;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    StateChanged {
        old: EditorState,
        new: EditorState,
    },
    DocumentChanged(DocumentEvent),
    SelectionChanged(SelectionEvent),
    LockChanged {
        element_id: ElementId,
        locked: bool,
    },
    Generation(GenerationEvent),
    /// An autosave attempt failed; reported once and not retried
    AutosaveFailed {
        message: String,
    },
    AutosaveCompleted {
        slides: usize,
    },
}

/// Coarse event categories a handler can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    State,
    Document,
    Selection,
    Lock,
    Generation,
    Autosave,
}

impl EditorEvent {
    pub fn topic(&self) -> EventTopic {
        match self {
            EditorEvent::StateChanged { .. } => EventTopic::State,
            EditorEvent::DocumentChanged(_) => EventTopic::Document,
            EditorEvent::SelectionChanged(_) => EventTopic::Selection,
            EditorEvent::LockChanged { .. } => EventTopic::Lock,
            EditorEvent::Generation(_) => EventTopic::Generation,
            EditorEvent::AutosaveFailed { .. } | EditorEvent::AutosaveCompleted { .. } => {
                EventTopic::Autosave
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    /// A command was committed
    Modified { command: &'static str },
    Undone,
    Redone,
    Loaded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Selected(ElementId),
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    Started,
    /// New slides were appended from the stream
    SlidesAppended { count: usize },
    Finished { slides: usize, used_fallback: bool },
    /// The generation stream reported an error
    Failed { message: String },
    Cancelled,
}
