//! The entity store: ground truth for all entity records.
//!
//! A `Store` holds one [`Table`] per entity kind and a reverse-reference
//! index from each referenced entity to the records pointing at it.
//! Everything is built from `im` persistent structures, so `clone()` is
//! O(number of kinds) and a clone shares every unmodified node with the
//! original. This is what makes shadow stores cheap.

use std::sync::Arc;

use flotilla_foundation::{
    Entity, EntityId, EntityKind, EntityRef, Error, RefField, Record, Result,
};

use crate::table::{Scan, Table};

/// A record that points at some entity, and through which column.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Referrer {
    /// The referencing entity.
    pub source: EntityRef,
    /// The column holding the reference.
    pub field: RefField,
}

/// In-memory mapping from kind + id to record.
///
/// Operations are pure data operations: `put` happily stores a record whose
/// references dangle. Validation happens elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Store {
    /// One table per kind, indexed by [`EntityKind::index`].
    tables: [Table; EntityKind::COUNT],
    /// Reverse index: target -> records referencing it.
    referrers: im::HashMap<EntityRef, im::OrdSet<Referrer>>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for a kind.
    #[must_use]
    pub fn table(&self, kind: EntityKind) -> &Table {
        &self.tables[kind.index()]
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut Table {
        &mut self.tables[kind.index()]
    }

    /// Returns the number of records of a kind.
    #[must_use]
    pub fn len(&self, kind: EntityKind) -> usize {
        self.table(kind).len()
    }

    /// Returns the number of records across all kinds.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }

    /// Returns true if the store holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(Table::is_empty)
    }

    /// Returns true if an entity exists.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.table(kind).contains(id)
    }

    // --- Reads ---

    /// Gets a record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record of that kind has this id.
    pub fn get(&self, kind: EntityKind, id: EntityId) -> Result<&Record> {
        self.find(kind, id).ok_or_else(|| Error::not_found(kind, id))
    }

    /// Gets a record, or `None` if it does not exist.
    #[must_use]
    pub fn find(&self, kind: EntityKind, id: EntityId) -> Option<&Record> {
        self.table(kind).get(id)
    }

    /// Gets a typed record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn get_as<T: Entity>(&self, id: EntityId) -> Result<&T> {
        self.find_as(id).ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Gets a typed record, or `None` if it does not exist.
    #[must_use]
    pub fn find_as<T: Entity>(&self, id: EntityId) -> Option<&T> {
        self.find(T::KIND, id).and_then(T::downcast)
    }

    /// Returns a snapshot of all records of a kind, in insertion order.
    #[must_use]
    pub fn scan(&self, kind: EntityKind) -> Scan {
        self.table(kind).scan()
    }

    /// Returns a snapshot of all records of type `T`, in insertion order.
    ///
    /// Like [`scan`](Self::scan), the result does not borrow the store and
    /// does not see later writes.
    pub fn scan_as<T: Entity>(&self) -> impl Iterator<Item = (EntityId, T)> + use<T> {
        self.scan(T::KIND)
            .into_iter()
            .filter_map(|(id, record)| T::downcast(&record).cloned().map(|r| (id, r)))
    }

    /// Iterates over typed records of a kind, in insertion order.
    pub fn iter_as<'a, T: Entity + 'a>(&'a self) -> impl Iterator<Item = (EntityId, &'a T)> + 'a {
        self.table(T::KIND)
            .iter()
            .filter_map(|(id, record)| T::downcast(record).map(|r| (id, r)))
    }

    /// Returns the records referencing `target`, ordered by source.
    pub(crate) fn referrers_of(&self, target: EntityRef) -> impl Iterator<Item = Referrer> + '_ {
        self.referrers
            .get(&target)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    // --- Writes ---

    /// Inserts or replaces a record. The kind is taken from the record.
    ///
    /// Returns the previous record with this kind and id, if any.
    pub fn put(&mut self, id: EntityId, record: impl Into<Record>) -> Option<Arc<Record>> {
        let record = record.into();
        let source = EntityRef::new(record.kind(), id);
        let new_refs = record.references();
        let previous = self.table_mut(source.kind).insert(id, record);
        if let Some(old) = &previous {
            self.unindex(source, old);
        }
        for reference in new_refs {
            self.referrers
                .entry(reference.target)
                .or_insert_with(im::OrdSet::new)
                .insert(Referrer {
                    source,
                    field: reference.field,
                });
        }
        previous
    }

    /// Removes a record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn delete(&mut self, kind: EntityKind, id: EntityId) -> Result<Arc<Record>> {
        let old = self
            .table_mut(kind)
            .remove(id)
            .ok_or_else(|| Error::not_found(kind, id))?;
        self.unindex(EntityRef::new(kind, id), &old);
        Ok(old)
    }

    fn unindex(&mut self, source: EntityRef, old: &Record) {
        for reference in old.references() {
            let emptied = match self.referrers.get_mut(&reference.target) {
                Some(set) => {
                    set.remove(&Referrer {
                        source,
                        field: reference.field,
                    });
                    set.is_empty()
                }
                None => false,
            };
            if emptied {
                self.referrers.remove(&reference.target);
            }
        }
    }
}
