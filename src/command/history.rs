use std::collections::VecDeque;

use crate::document::Presentation;

/// A full value copy of the document at one point in time.
pub type Snapshot = Presentation;

/// Manages the snapshots behind undo/redo.
///
/// `past` holds the state immediately preceding each committed mutation,
/// newest at the back. `future` is only filled by `undo` and is discarded by
/// every new mutation, so history stays linear.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    /// Maximum number of undo steps; `None` keeps everything
    limit: Option<usize>,
}

impl History {
    /// Creates a new unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history that keeps at most `limit` undo steps
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record the state a mutation is about to replace
    pub fn record(&mut self, snapshot: Snapshot) {
        self.past.push_back(snapshot);
        self.future.clear();

        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.pop_front();
            }
        }
    }

    /// Step back: returns the state to restore, keeping `current` for redo
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        Some(next)
    }

    /// Returns true if there are states that can be restored by undo
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns true if there are states that can be restored by redo
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Clear both stacks
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> Snapshot {
        Presentation::new(title)
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        let mut history = History::new();
        assert!(history.undo(titled("a")).is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_then_redo_walks_both_stacks() {
        let mut history = History::new();
        history.record(titled("a"));

        let restored = history.undo(titled("b")).unwrap();
        assert_eq!(restored.title, "a");
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again.title, "b");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn record_discards_future() {
        let mut history = History::new();
        history.record(titled("a"));
        history.undo(titled("b"));
        history.record(titled("a"));
        assert!(!history.can_redo());
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut history = History::with_limit(Some(2));
        for title in ["a", "b", "c"] {
            history.record(titled(title));
        }
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(titled("d")).unwrap().title, "c");
        assert_eq!(history.undo(titled("c")).unwrap().title, "b");
        assert!(history.undo(titled("b")).is_none());
    }
}
