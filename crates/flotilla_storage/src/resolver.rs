//! Reference resolution over a store.
//!
//! The resolver answers two questions: does the entity a reference names
//! exist, and who points at a given entity. Reverse lookups are served from
//! the store's reverse index, so they cost O(referrers) rather than a scan.

use flotilla_foundation::{EntityId, EntityKind, EntityRef, RefField, Record, Reference};

use crate::store::{Referrer, Store};

/// Read-only reference queries over one store.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    store: &'a Store,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over `store`.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Returns true if the entity exists.
    #[must_use]
    pub fn exists(&self, kind: EntityKind, id: EntityId) -> bool {
        self.store.contains(kind, id)
    }

    /// Resolves a reference to its target record.
    #[must_use]
    pub fn resolve(&self, reference: &Reference) -> Option<&'a Record> {
        self.store.find(reference.target.kind, reference.target.id)
    }

    /// Returns the distinct entities referencing the target, ordered by kind then id.
    #[must_use]
    pub fn referrers(&self, kind: EntityKind, id: EntityId) -> Vec<EntityRef> {
        let mut sources: Vec<EntityRef> = self
            .store
            .referrers_of(EntityRef::new(kind, id))
            .map(|r| r.source)
            .collect();
        // Referrers are sorted by source first, so duplicates are adjacent
        sources.dedup();
        sources
    }

    /// Returns every `(source, column)` pair referencing the target.
    #[must_use]
    pub fn referrer_entries(&self, target: EntityRef) -> Vec<Referrer> {
        self.store.referrers_of(target).collect()
    }

    /// Returns the ids of entities referencing the target through `field`.
    #[must_use]
    pub fn referrers_via(&self, target: EntityId, field: RefField) -> Vec<EntityId> {
        self.store
            .referrers_of(EntityRef::new(field.target_kind(), target))
            .filter(|r| r.field == field)
            .map(|r| r.source.id)
            .collect()
    }

    /// Counts entities referencing the target through `field`.
    #[must_use]
    pub fn count_via(&self, target: EntityId, field: RefField) -> usize {
        self.store
            .referrers_of(EntityRef::new(field.target_kind(), target))
            .filter(|r| r.field == field)
            .count()
    }

    /// Returns the references held by `record` that do not resolve.
    #[must_use]
    pub fn dangling(&self, record: &Record) -> Vec<Reference> {
        record
            .references()
            .into_iter()
            .filter(|r| self.resolve(r).is_none())
            .collect()
    }
}
