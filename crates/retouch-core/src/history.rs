//! Linear undo history.
//!
//! The history is a vector of full snapshots plus a cursor. Pushing while
//! the cursor sits before the end truncates the redo tail first, so there
//! are no branches. Undo and redo only move the cursor; restoring the
//! snapshot into the session is the caller's job.
//!
//! Snapshots are cheap relative to the base image: they carry slider
//! values and overlay vectors, never pixels. Cropping rewrites the base
//! bitmap destructively, so undoing past a crop restores the crop
//! rectangle state but not the discarded pixels.

use serde::{Deserialize, Serialize};

use crate::overlay::{DrawingPath, ShapeOverlay, TextOverlay};
use crate::{Adjustments, CropRect, Transform};

/// Everything undo needs to restore, captured after each completed edit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub adjustments: Adjustments,
    pub transform: Transform,
    pub paths: Vec<DrawingPath>,
    pub texts: Vec<TextOverlay>,
    pub shapes: Vec<ShapeOverlay>,
    pub crop: Option<CropRect>,
}

/// Snapshot stack with a cursor. The entry at the cursor is the current
/// state; entries past it are the redo tail.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    /// Start a history at the given initial state. The initial entry can
    /// be returned to but never undone past.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Record a new state, discarding any redo tail.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor += 1;
    }

    /// Step back one entry, returning the state to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward one entry, returning the state to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The state at the cursor.
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    /// Number of recorded states (including the initial one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
