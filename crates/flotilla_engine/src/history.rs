//! Commit history for reading past states.
//!
//! A bounded ring buffer of committed snapshots. Snapshots share structure
//! with each other and with the live store, so retaining many is cheap.

use std::collections::VecDeque;
use std::sync::Arc;

use flotilla_storage::Store;

use crate::intent::CommitId;

// =============================================================================
// Commit Summary
// =============================================================================

/// What a committed transaction did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of entities inserted.
    pub inserted: usize,
    /// Number of entities updated.
    pub updated: usize,
    /// Number of entities deleted.
    pub deleted: usize,
    /// Number of ships whose damage was derived from their reports.
    pub repaired: usize,
}

impl CommitSummary {
    /// Returns the number of intents applied.
    #[must_use]
    pub const fn intents(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

// =============================================================================
// Commit Record
// =============================================================================

/// A committed state and how it came to be.
#[derive(Clone, Debug)]
pub struct CommitRecord {
    id: CommitId,
    summary: CommitSummary,
    store: Arc<Store>,
}

impl CommitRecord {
    /// Creates a commit record.
    #[must_use]
    pub fn new(id: CommitId, summary: CommitSummary, store: Arc<Store>) -> Self {
        Self { id, summary, store }
    }

    /// Returns the commit id.
    #[must_use]
    pub const fn id(&self) -> CommitId {
        self.id
    }

    /// Returns the commit summary.
    #[must_use]
    pub const fn summary(&self) -> &CommitSummary {
        &self.summary
    }

    /// Returns the store as of this commit.
    #[must_use]
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }
}

// =============================================================================
// Commit Log
// =============================================================================

/// Ring buffer of the most recent commits.
#[derive(Clone, Debug)]
pub struct CommitLog {
    capacity: usize,
    records: VecDeque<CommitRecord>,
}

impl CommitLog {
    /// Creates a log retaining at most `capacity` commits.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Returns the maximum number of retained commits.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of retained commits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no commits are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a commit, evicting the oldest if full.
    pub fn push(&mut self, record: CommitRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Finds a retained commit by id.
    #[must_use]
    pub fn get(&self, id: CommitId) -> Option<&CommitRecord> {
        // Ids are consecutive, so the position is computable from the oldest
        let oldest = self.records.front()?.id;
        let offset = id.0.checked_sub(oldest.0)?;
        let record = self.records.get(usize::try_from(offset).ok()?)?;
        (record.id == id).then_some(record)
    }

    /// Returns the most recent commit.
    #[must_use]
    pub fn latest(&self) -> Option<&CommitRecord> {
        self.records.back()
    }

    /// Iterates over retained commits, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &CommitRecord> {
        self.records.iter()
    }
}
