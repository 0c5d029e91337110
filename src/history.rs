//! A rolling window of the most recent entries.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

pub const DEFAULT_HISTORY_LENGTH: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Keeps at most `capacity` entries, dropping the oldest when a push
/// exceeds it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: NonZeroUsize,
}

impl<T> History<T> {
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        History {
            entries: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Appends `entry`, dropping the oldest entry if the window is full, and
    /// returns the appended entry.
    pub fn push(&mut self, entry: T) -> &T {
        if self.entries.len() == self.capacity.get() {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        // Never empty after a push.
        &self.entries[self.entries.len() - 1]
    }

    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        History::new(DEFAULT_HISTORY_LENGTH)
    }
}
