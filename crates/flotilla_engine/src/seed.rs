//! Seed datasets for bulk-loading an engine.

use flotilla_foundation::{EntityId, Record};

/// An ordered collection of records used to initialize an engine.
///
/// Rows are stored in the order given. A dataset is not validated until it
/// is loaded; see [`Engine::load`](crate::Engine::load).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dataset {
    rows: Vec<(EntityId, Record)>,
}

impl Dataset {
    /// Creates an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to append a row.
    #[must_use]
    pub fn with(mut self, id: EntityId, record: impl Into<Record>) -> Self {
        self.push(id, record);
        self
    }

    /// Appends a row.
    pub fn push(&mut self, id: EntityId, record: impl Into<Record>) {
        self.rows.push((id, record.into()));
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows in order.
    #[must_use]
    pub fn rows(&self) -> &[(EntityId, Record)] {
        &self.rows
    }
}

impl FromIterator<(EntityId, Record)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (EntityId, Record)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dataset {
    type Item = (EntityId, Record);
    type IntoIter = std::vec::IntoIter<(EntityId, Record)>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
