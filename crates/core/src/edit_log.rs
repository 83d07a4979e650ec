//! Bounded undo/redo stacks, owned by a single map session.
//!
//! Both stacks are append-at-top / pop-from-top. Recording a forward
//! edit clears the redo stack (linear-history discipline: a new edit
//! invalidates the redo future). Depth is capped with FIFO eviction
//! from the bottom so an editing marathon cannot grow memory without
//! bound.

use std::collections::VecDeque;

use crate::action::EditLogEntry;

/// Maximum number of entries retained per stack.
pub const MAX_HISTORY_DEPTH: usize = 200;

/// The undo/redo history of one map session.
#[derive(Debug, Default)]
pub struct EditLog {
    undo: VecDeque<EditLogEntry>,
    redo: VecDeque<EditLogEntry>,
    max_depth: usize,
}

impl EditLog {
    /// An empty log with the default depth cap.
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY_DEPTH)
    }

    /// An empty log with a custom depth cap (tests use small caps).
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a forward edit: push onto undo, clear redo.
    pub fn record(&mut self, entry: EditLogEntry) {
        self.redo.clear();
        self.push_undo(entry);
    }

    /// Push onto the undo stack, evicting the oldest entry at the cap.
    pub fn push_undo(&mut self, entry: EditLogEntry) {
        if self.undo.len() == self.max_depth {
            self.undo.pop_front();
        }
        self.undo.push_back(entry);
    }

    /// Push onto the redo stack, evicting the oldest entry at the cap.
    pub fn push_redo(&mut self, entry: EditLogEntry) {
        if self.redo.len() == self.max_depth {
            self.redo.pop_front();
        }
        self.redo.push_back(entry);
    }

    /// Pop the most recent undo entry.
    pub fn pop_undo(&mut self) -> Option<EditLogEntry> {
        self.undo.pop_back()
    }

    /// Pop the most recent redo entry.
    pub fn pop_redo(&mut self) -> Option<EditLogEntry> {
        self.redo.pop_back()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Drop all history (map navigation).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
