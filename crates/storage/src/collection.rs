//! Keyed, insertion-ordered record storage for one entity type
//!
//! # Design
//!
//! - FxHashMap: O(1) lookups by identifier
//! - Vec of identifiers: iteration order, append-on-first-insert
//!
//! The map and the order vector always hold exactly the same identifiers.
//! Updating an existing identifier replaces the map entry and leaves its
//! position untouched; removal shifts later entries down without reordering.

use rustc_hash::FxHashMap;
use shapedb_core::{Identifier, Record};

/// Outcome of a single upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The identifier was new and was appended to the sequence
    Inserted,
    /// The identifier existed; its record was replaced in place
    Updated,
}

/// One entity type's records
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Identifier -> record
    records: FxHashMap<Identifier, Record>,
    /// Identifiers in insertion order
    order: Vec<Identifier>,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check if an identifier is present
    #[inline]
    pub fn contains(&self, id: &Identifier) -> bool {
        self.records.contains_key(id)
    }

    /// Look up a record by identifier
    #[inline]
    pub fn get(&self, id: &Identifier) -> Option<&Record> {
        self.records.get(id)
    }

    /// Record at a sequence position
    #[inline]
    pub fn get_at(&self, index: usize) -> Option<&Record> {
        self.order.get(index).and_then(|id| self.records.get(id))
    }

    /// Insert a new record or replace an existing one in place
    pub fn upsert(&mut self, record: Record) -> Upsert {
        let id = record.id().clone();
        match self.records.insert(id.clone(), record) {
            Some(_) => Upsert::Updated,
            None => {
                self.order.push(id);
                Upsert::Inserted
            }
        }
    }

    /// Remove a record, returning it if it was present
    ///
    /// O(n) in the sequence length: survivors keep their relative order.
    pub fn remove(&mut self, id: &Identifier) -> Option<Record> {
        let removed = self.records.remove(id)?;
        if let Some(pos) = self.order.iter().position(|o| o == id) {
            self.order.remove(pos);
        }
        Some(removed)
    }

    /// Identifiers in sequence order
    pub fn ids(&self) -> &[Identifier] {
        &self.order
    }

    /// Records in sequence order
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.order.iter().filter_map(move |id| self.records.get(id))
    }
}
