//! Bounded linear undo/redo log of serialized document snapshots.
//!
//! DESIGN
//! ======
//! History stores full SVG snapshots, not deltas; the documents involved
//! are small enough that copies beat delta bookkeeping. A cursor marks the
//! snapshot currently on screen. Undo and redo only move the cursor; the
//! log itself changes on push (truncating any redo tail, then evicting the
//! oldest entry past the capacity bound) and on reset.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::consts::MAX_HISTORY;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Snapshot returned from a cursor move, with the resulting capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub snapshot: String,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Bounded snapshot log. Empty iff `entries` is empty; otherwise the
/// cursor always indexes a valid entry.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot at the cursor, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor < self.entries.len() - 1
    }

    /// All retained snapshots, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> &[String] {
        &self.entries
    }

    /// Append a snapshot after the cursor and move the cursor onto it.
    ///
    /// Entries beyond the cursor (the redo tail) are discarded first, so a
    /// fresh edit after an undo cannot resurrect stale future states. When
    /// the log exceeds [`MAX_HISTORY`], the oldest entry is evicted.
    pub fn push(&mut self, snapshot: String) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        while self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Replace the log with a single seed snapshot, cursor on it.
    pub fn reset_with(&mut self, snapshot: String) {
        self.entries = vec![snapshot];
        self.cursor = 0;
    }

    /// Move the cursor back one entry.
    ///
    /// # Errors
    ///
    /// `NothingToUndo` when the cursor is at the oldest entry or the log
    /// is empty.
    pub fn undo(&mut self) -> Result<HistoryView, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        self.cursor -= 1;
        Ok(self.view())
    }

    /// Move the cursor forward one entry.
    ///
    /// # Errors
    ///
    /// `NothingToRedo` when the cursor is at the newest entry or the log
    /// is empty.
    pub fn redo(&mut self) -> Result<HistoryView, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        self.cursor += 1;
        Ok(self.view())
    }

    fn view(&self) -> HistoryView {
        HistoryView {
            snapshot: self.entries[self.cursor].clone(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }
}
