// SPDX-License-Identifier: GPL-3.0-only

//! Undo/redo log of committed transforms

use super::state::Transform;
use tracing::debug;

/// Linear undo history over transform snapshots
///
/// Always holds at least the identity entry. Pushing after an undo discards
/// the redo branch.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<Transform>,
    index: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self {
            entries: vec![Transform::IDENTITY],
            index: 0,
        }
    }

    /// Record a committed transform
    ///
    /// Returns `false` when the transform is within the dedupe threshold of the
    /// current entry; the stack is left untouched in that case.
    pub fn push(&mut self, transform: Transform) -> bool {
        if self.current().is_near(&transform) {
            debug!(%transform, "Skipping near-duplicate history entry");
            return false;
        }

        self.entries.truncate(self.index + 1);
        self.entries.push(transform);
        self.index = self.entries.len() - 1;
        true
    }

    /// Step back one entry, returning the transform to restore
    pub fn undo(&mut self) -> Option<Transform> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index])
    }

    /// Step forward one entry, returning the transform to restore
    pub fn redo(&mut self) -> Option<Transform> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index])
    }

    /// Drop everything and start over from the identity entry
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(Transform::IDENTITY);
        self.index = 0;
    }

    pub fn current(&self) -> Transform {
        self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true; the stack always holds the identity entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Transform] {
        &self.entries
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(scale: f64, rotation: f64) -> Transform {
        Transform::new(scale, 0.0, 0.0, rotation)
    }

    #[test]
    fn test_starts_with_identity() {
        let history = HistoryStack::new();
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert_eq!(history.current(), Transform::IDENTITY);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_after_undo_discards_redo_branch() {
        let mut history = HistoryStack::new();
        history.push(t(2.0, 0.0));
        history.push(t(3.0, 0.0));
        assert_eq!(history.undo(), Some(t(2.0, 0.0)));

        assert!(history.push(t(2.0, 90.0)));
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.entries()[2], t(2.0, 90.0));
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let mut history = HistoryStack::new();
        assert_eq!(history.undo(), None);
        history.push(t(2.0, 0.0));
        assert_eq!(history.redo(), None);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_dedupe_against_current_entry_not_top() {
        let mut history = HistoryStack::new();
        history.push(t(2.0, 0.0));
        history.undo();
        // Near the current (identity) entry, so dropped even though the top differs
        assert!(!history.push(t(1.0005, 0.0)));
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_reset() {
        let mut history = HistoryStack::new();
        history.push(t(2.0, 0.0));
        history.push(t(3.0, 0.0));
        history.reset();
        assert_eq!(history.entries(), &[Transform::IDENTITY]);
        assert_eq!(history.index(), 0);
    }
}
