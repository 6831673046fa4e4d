//! Per-kind record tables with structural sharing.
//!
//! A `Table` keeps records keyed by id plus an insertion-order index, both in
//! `im` persistent maps, so cloning a table is O(1) and a clone is unaffected
//! by later writes to the original.

use std::sync::Arc;

use flotilla_foundation::{EntityId, Record};

/// One stored record and its insertion sequence number.
#[derive(Clone, Debug)]
struct Row {
    seq: u64,
    record: Arc<Record>,
}

/// Records of a single kind, iterable in insertion order.
///
/// Equality compares content only: the same records in the same order.
/// Sequence numbers left behind by deletes are not part of it.
#[derive(Clone, Debug, Default)]
pub struct Table {
    /// Rows by id.
    rows: im::HashMap<EntityId, Row>,
    /// Insertion sequence -> id.
    order: im::OrdMap<u64, EntityId>,
    /// Next sequence number to hand out.
    next_seq: u64,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if a record with this id exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    /// Gets a record by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Record> {
        self.rows.get(&id).map(|row| row.record.as_ref())
    }

    /// Inserts or replaces a record, returning the previous one.
    ///
    /// Replacing keeps the record's original insertion position.
    pub fn insert(&mut self, id: EntityId, record: Record) -> Option<Arc<Record>> {
        let record = Arc::new(record);
        if let Some(row) = self.rows.get_mut(&id) {
            return Some(std::mem::replace(&mut row.record, record));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, id);
        self.rows.insert(id, Row { seq, record });
        None
    }

    /// Removes a record, returning it.
    pub fn remove(&mut self, id: EntityId) -> Option<Arc<Record>> {
        let row = self.rows.remove(&id)?;
        self.order.remove(&row.seq);
        Some(row.record)
    }

    /// Iterates over `(id, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Record)> + '_ {
        self.order
            .values()
            .filter_map(|id| self.rows.get(id).map(|row| (*id, row.record.as_ref())))
    }

    /// Returns a snapshot of this table for iteration.
    #[must_use]
    pub fn scan(&self) -> Scan {
        Scan {
            table: self.clone(),
        }
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for Table {}

/// A point-in-time snapshot of one table.
///
/// Later writes to the store do not affect a `Scan`. Iterating it again
/// starts over from the first record.
#[derive(Clone, Debug)]
pub struct Scan {
    table: Table,
}

impl Scan {
    /// Iterates over `(id, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Record)> + '_ {
        self.table.iter()
    }

    /// Returns the number of records in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }
}

impl IntoIterator for Scan {
    type Item = (EntityId, Arc<Record>);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        let Table { rows, order, .. } = self.table;
        IntoIter {
            rows,
            order,
            cursor: 0,
        }
    }
}

/// Owning iterator over a [`Scan`], yielding rows as it walks the order index.
pub struct IntoIter {
    rows: im::HashMap<EntityId, Row>,
    order: im::OrdMap<u64, EntityId>,
    /// Lowest sequence number not yet yielded.
    cursor: u64,
}

impl Iterator for IntoIter {
    type Item = (EntityId, Arc<Record>);

    fn next(&mut self) -> Option<Self::Item> {
        let (&seq, &id) = self.order.range(self.cursor..).next()?;
        self.cursor = seq + 1;
        let row = self.rows.get(&id)?;
        Some((id, Arc::clone(&row.record)))
    }
}

impl std::fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntoIter")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
