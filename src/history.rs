//! Linear undo/redo history.
//!
//! [`History`] keeps every committed snapshot in order plus a cursor to the
//! current one. Pushing while the cursor sits behind the newest entry drops
//! the redo tail first, so there is only ever one branch.
//!
//! ```text
//!  push a, push b, undo        push c
//!  [s0, a, b]                  [s0, a, c]
//!        ^ cursor                     ^ cursor   (b is gone)
//! ```

use std::fmt;

use crate::style::{StylePatch, StyleState};

/// A value that can produce its successor from a partial change.
pub trait Snapshot: Clone {
    type Patch;

    /// Returns the state that results from applying `patch` to `self`.
    fn merge(&self, patch: &Self::Patch) -> Self;
}

impl Snapshot for StyleState {
    type Patch = StylePatch;

    fn merge(&self, patch: &StylePatch) -> Self {
        StyleState::merge(self, patch)
    }
}

/// Undo/redo availability, reported to subscribers after each change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

type Subscriber = Box<dyn FnMut(HistoryStatus)>;

/// Append-only history with a cursor and redo truncation.
///
/// Always holds at least one entry, so [`current`](Self::current) never fails.
pub struct History<S: Snapshot = StyleState> {
    entries: Vec<S>,
    cursor: usize,
    subscribers: Vec<Subscriber>,
}

impl<S: Snapshot> History<S> {
    /// Creates a history seeded with `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            subscribers: Vec::new(),
        }
    }

    /// The state at the cursor.
    pub fn current(&self) -> &S {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of stored states, including the seed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no states are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Registers a callback invoked with the new status after every change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(HistoryStatus) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Merges `patch` into the current state and appends the result.
    ///
    /// Any redoable entries after the cursor are discarded first.
    pub fn push(&mut self, patch: &S::Patch) {
        let next = self.current().merge(patch);
        let dropped = self.entries.len() - (self.cursor + 1);
        self.entries.truncate(self.cursor + 1);
        self.entries.push(next);
        self.cursor = self.entries.len() - 1;
        tracing::debug!(cursor = self.cursor, dropped, "history push");
        self.notify();
    }

    /// Steps back one entry. Returns false (and changes nothing) at the start.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        tracing::debug!(cursor = self.cursor, "history undo");
        self.notify();
        true
    }

    /// Steps forward one entry. Returns false (and changes nothing) at the end.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        tracing::debug!(cursor = self.cursor, "history redo");
        self.notify();
        true
    }

    /// Iterates over all stored states, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.entries.iter()
    }

    fn notify(&mut self) {
        let status = self.status();
        for subscriber in &mut self.subscribers {
            subscriber(status);
        }
    }
}

impl Default for History<StyleState> {
    fn default() -> Self {
        Self::new(StyleState::default())
    }
}

impl<S: Snapshot + fmt::Debug> fmt::Debug for History<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("entries", &self.entries)
            .field("cursor", &self.cursor)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
