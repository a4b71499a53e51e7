//! Bounded log of recent ownership transitions.

use std::collections::VecDeque;

use turf_war_core::ActivityEntry;

/// Number of transitions retained by the log.
pub const ACTIVITY_LOG_CAPACITY: usize = 5;

/// First-in, first-out record of the most recent ownership transitions.
#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    pub(crate) fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(ACTIVITY_LOG_CAPACITY),
        }
    }

    /// Appends an entry, evicting the oldest one once the log is full.
    pub(crate) fn push(&mut self, entry: ActivityEntry) {
        if self.entries.len() == ACTIVITY_LOG_CAPACITY {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates the retained entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter().rev()
    }

    /// Most recent transition, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the retained entries, newest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ActivityEntry> {
        self.iter().cloned().collect()
    }
}
