//! Restartable cursors over room membership and history.
//!
//! A cursor snapshots its sequence when it is created, so it never observes
//! joins, leaves or new messages that happen while it is being walked.

use std::rc::Rc;

use super::user::User;

/// An iterator that can report whether items remain and rewind to the start.
pub trait RestartableIterator: Iterator {
    /// True while the cursor has not reached the end of the sequence.
    fn has_next(&self) -> bool;

    /// Move the cursor back to the first element.
    fn reset(&mut self);
}

/// Forward-only cursor over a snapshot of a sequence.
#[derive(Debug, Clone)]
pub struct Cursor<T> {
    items: Vec<T>,
    position: usize,
}

/// Cursor over a room's history entries.
pub type HistoryIter = Cursor<String>;

/// Cursor over a room's members.
pub type MemberIter = Cursor<Rc<User>>;

impl<T: Clone> Cursor<T> {
    /// Create a cursor positioned before the first element.
    pub fn new(items: Vec<T>) -> Self {
        Self { items, position: 0 }
    }

    /// Total number of elements in the snapshot.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the next element to be returned.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    /// Returns `None` past the end without moving the cursor.
    fn next(&mut self) -> Option<T> {
        let item = self.items.get(self.position).cloned()?;
        self.position += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Cursor<T> {}

impl<T: Clone> RestartableIterator for Cursor<T> {
    fn has_next(&self) -> bool {
        self.position < self.items.len()
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}
