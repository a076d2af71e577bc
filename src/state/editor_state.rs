//! The mode machine of an editing session.
//!
//! ```text
//!              ┌────────────┐
//!        ┌─────►  Editing   ├─────┐
//!        │     └─────┬──────┘     │
//! ┌──────┴───┐       │       ┌────▼───────┐
//! │   Idle   ◄───────┼───────┤ Generating │
//! └──────┬───┘       │       └────▲───────┘
//!        │           └────────────┘
//!        └────────────────────────┘
//! ```
//!
//! While `Generating`, the document only grows from the stream; user
//! commands are refused until the editor returns to `Idle`.

use crate::element::ElementId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    /// No active operation
    #[default]
    Idle,
    /// Editing the content of an element
    Editing { element_id: ElementId },
    /// Slides are streaming in from the generator
    Generating,
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            // Editing can jump straight to another element
            (EditorState::Idle | EditorState::Editing { .. }, EditorState::Editing { .. }) => true,
            (EditorState::Idle | EditorState::Editing { .. }, EditorState::Generating) => true,
            (_, EditorState::Idle) => true,
            _ => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, EditorState::Generating)
    }

    /// The element being edited, if in editing state
    pub fn editing_element(&self) -> Option<&ElementId> {
        match self {
            EditorState::Editing { element_id } => Some(element_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generating_only_returns_to_idle() {
        let generating = EditorState::Generating;
        assert!(generating.can_transition_to(&EditorState::Idle));
        assert!(!generating.can_transition_to(&EditorState::Editing {
            element_id: "e".into()
        }));
        assert!(!generating.can_transition_to(&EditorState::Generating));
    }

    #[test]
    fn editing_can_switch_elements() {
        let editing = EditorState::Editing {
            element_id: "a".into(),
        };
        assert!(editing.can_transition_to(&EditorState::Editing {
            element_id: "b".into()
        }));
        assert_eq!(editing.editing_element().map(String::as_str), Some("a"));
    }
}
