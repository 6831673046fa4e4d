//! Mutation intents and commit identifiers.

use std::fmt;

use flotilla_foundation::{EntityId, EntityKind, EntityRef, Record};

/// A requested mutation, one step of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Create a new entity. Fails if the id is taken.
    Insert {
        /// Identifier for the new entity.
        id: EntityId,
        /// The record. Its variant decides the kind.
        record: Record,
    },
    /// Replace an existing entity's record. Fails if it does not exist.
    Update {
        /// Identifier of the entity.
        id: EntityId,
        /// The replacement record.
        record: Record,
    },
    /// Remove an entity. Fails if it does not exist.
    Delete {
        /// Kind of the entity.
        kind: EntityKind,
        /// Identifier of the entity.
        id: EntityId,
    },
}

impl Intent {
    /// Creates an insert intent.
    #[must_use]
    pub fn insert(id: EntityId, record: impl Into<Record>) -> Self {
        Self::Insert {
            id,
            record: record.into(),
        }
    }

    /// Creates an update intent.
    #[must_use]
    pub fn update(id: EntityId, record: impl Into<Record>) -> Self {
        Self::Update {
            id,
            record: record.into(),
        }
    }

    /// Creates a delete intent.
    #[must_use]
    pub fn delete(kind: EntityKind, id: EntityId) -> Self {
        Self::Delete { kind, id }
    }

    /// Returns the entity this intent targets.
    #[must_use]
    pub fn target(&self) -> EntityRef {
        match self {
            Self::Insert { id, record } | Self::Update { id, record } => {
                EntityRef::new(record.kind(), *id)
            }
            Self::Delete { kind, id } => EntityRef::new(*kind, *id),
        }
    }
}

/// Identifier of a committed transaction. Increases by one per commit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CommitId(pub u64);

impl CommitId {
    /// The state an engine starts from: empty, or freshly seeded.
    pub const GENESIS: CommitId = CommitId(0);

    /// Returns the id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}
