//! The ordered candidate queue behind the card stack.
//!
//! `CandidateQueue` is append-only: items are never edited or removed, and the
//! cursor only moves forward. Everything behind the cursor is history.
//!
//! Invariants:
//! - `0 <= cursor <= items.len()`
//! - every id appears at most once over the lifetime of the queue

use crate::types::{CandidateId, CandidateItem};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Append-only candidate sequence with a forward-only cursor.
#[derive(Debug, Default, Clone)]
pub struct CandidateQueue {
    items: Vec<CandidateItem>,
    /// Every id ever appended, for O(1) duplicate checks
    ids: HashSet<CandidateId>,
    cursor: usize,
}

impl CandidateQueue {
    /// Create an empty queue (screen mounted with nothing cached).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue seeded from a cached result set.
    pub fn from_items(items: Vec<CandidateItem>) -> Self {
        let mut queue = Self::new();
        queue.append(items);
        queue
    }

    /// Append items at the tail, preserving their order.
    ///
    /// Items whose id is already in the queue (including history behind the
    /// cursor) are skipped and logged.
    ///
    /// # Returns
    /// The number of items actually appended
    pub fn append(&mut self, items: Vec<CandidateItem>) -> usize {
        if items.is_empty() {
            return 0;
        }

        let offered = items.len();
        let mut appended = 0;
        for item in items {
            if self.ids.contains(&item.id) {
                warn!("Skipping duplicate candidate {} on append", item.id);
                continue;
            }
            self.ids.insert(item.id.clone());
            self.items.push(item);
            appended += 1;
        }

        debug!(
            "Appended {} of {} offered candidates (queue length: {})",
            appended,
            offered,
            self.items.len()
        );
        appended
    }

    /// Move the cursor past the current item.
    ///
    /// Clamped at the end of the queue: advancing an exhausted queue is a
    /// no-op that returns `false`.
    pub fn advance(&mut self) -> bool {
        if self.cursor >= self.items.len() {
            debug!("Advance requested on exhausted queue (length {})", self.items.len());
            return false;
        }
        self.cursor += 1;
        true
    }

    /// The card on top of the stack.
    pub fn current(&self) -> Option<&CandidateItem> {
        self.items.get(self.cursor)
    }

    /// The card underneath the top one.
    pub fn peek_next(&self) -> Option<&CandidateItem> {
        self.items.get(self.cursor + 1)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of items ever appended.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items at or ahead of the cursor.
    pub fn remaining(&self) -> usize {
        self.items.len() - self.cursor
    }

    /// No current item is left to show.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn items(&self) -> &[CandidateItem] {
        &self.items
    }

    /// Items the cursor has already passed.
    pub fn history(&self) -> &[CandidateItem] {
        &self.items[..self.cursor]
    }
}
