use crate::global_variables::DEFAULT_FEED_CAPACITY;
use crate::shared_data::{NotificationEvent, Severity};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: u64,
    pub event: NotificationEvent,
    pub read: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub info: usize,
    pub success: usize,
    pub warning: usize,
    pub critical: usize,
}

impl SeverityCounts {
    fn slot(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Info => &mut self.info,
            Severity::Success => &mut self.success,
            Severity::Warning => &mut self.warning,
            Severity::Critical => &mut self.critical,
        }
    }
}

/// In-memory feed of emitted notifications, newest last.
///
/// Holds at most `capacity` entries; pushing onto a full feed drops the oldest.
/// Unread and per-severity counts are kept up to date on every change and
/// cover only the entries still held.
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
    next_id: u64,
    unread: usize,
    counts: SeverityCounts,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    // A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_FEED_CAPACITY)),
            capacity,
            next_id: 0,
            unread: 0,
            counts: SeverityCounts::default(),
        }
    }

    pub fn push(&mut self, event: NotificationEvent) -> u64 {
        if self.entries.len() == self.capacity {
            if let Some(dropped) = self.entries.pop_front() {
                self.forget(&dropped);
            }
        }
        self.next_id += 1;
        let id = self.next_id;
        *self.counts.slot(event.severity) += 1;
        self.unread += 1;
        self.entries.push_back(FeedEntry {
            id,
            event,
            read: false,
        });
        id
    }

    fn forget(&mut self, entry: &FeedEntry) {
        *self.counts.slot(entry.event.severity) -= 1;
        if !entry.read {
            self.unread -= 1;
        }
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = NotificationEvent>) {
        for event in events {
            self.push(event);
        }
    }

    // Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    // Newest first, at most `limit` entries.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    /// Returns false when no entry has this id.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                if !entry.read {
                    entry.read = true;
                    self.unread -= 1;
                }
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
        self.unread = 0;
    }

    pub fn count_by_severity(&self) -> SeverityCounts {
        self.counts
    }
}
