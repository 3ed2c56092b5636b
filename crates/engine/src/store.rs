//! Collection store: authoritative storage for one entity type
//!
//! # Design
//!
//! A `CollectionStore` owns its [`Collection`] and the [`IdentifierPolicy`]
//! used to allocate identifiers for new records. Every record crossing the
//! store boundary, in either direction, is an independent copy: inputs are
//! taken by value and outputs are clones, so no caller can reach internal
//! state.
//!
//! # Example
//!
//! ```
//! use shapedb_core::{Attributes, SequentialPolicy};
//! use shapedb_engine::CollectionStore;
//!
//! let mut contacts = CollectionStore::new("contact", "id", SequentialPolicy::new());
//!
//! let mut attrs = Attributes::new();
//! attrs.insert("name".into(), "Ada".into());
//! let saved = contacts.create([attrs]);
//!
//! assert_eq!(contacts.count(), 1);
//! assert_eq!(contacts.find_by_id([saved[0].id()]), saved);
//! ```

use std::fmt;

use serde_json::Value;
use shapedb_core::{Attributes, Identifier, IdentifierPolicy, Record, Result};
use shapedb_storage::{Collection, Upsert};

use crate::search::{self, FindContext, FindOptions, Matcher, NeverStop, Stopper};

/// Identifier field name used when an entity does not choose one
pub const DEFAULT_ID_FIELD: &str = "id";

/// Storage and operations for one entity type
pub struct CollectionStore {
    /// Entity type name, passed to the identifier policy
    name: String,
    /// Field holding the identifier in the JSON form of a record
    id_field: String,
    policy: Box<dyn IdentifierPolicy>,
    collection: Collection,
}

impl CollectionStore {
    /// Create an empty store
    ///
    /// # Arguments
    ///
    /// * `name` - Entity type name
    /// * `id_field` - Identifier field name in the JSON form of a record
    /// * `policy` - Allocates identifiers for [`new_record`](Self::new_record)
    pub fn new(
        name: impl Into<String>,
        id_field: impl Into<String>,
        policy: impl IdentifierPolicy + 'static,
    ) -> Self {
        Self::with_boxed_policy(name, id_field, Box::new(policy))
    }

    /// Create an empty store from an already boxed policy
    pub fn with_boxed_policy(
        name: impl Into<String>,
        id_field: impl Into<String>,
        policy: Box<dyn IdentifierPolicy>,
    ) -> Self {
        Self {
            name: name.into(),
            id_field: id_field.into(),
            policy,
            collection: Collection::new(),
        }
    }

    /// Entity type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier field name
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Allocate a fresh identifier and merge it with `partial`
    ///
    /// Attributes absent from `partial` stay absent. Storage is not touched;
    /// only the identifier policy advances. A value under the identifier
    /// field name is dropped in favour of the allocated identifier.
    pub fn new_record(&mut self, mut partial: Attributes) -> Record {
        partial.remove(&self.id_field);
        let id = self.policy.next(&self.name);
        Record::with_attributes(id, partial)
    }

    /// Insert or update each record by identifier
    ///
    /// New identifiers are appended to the sequence; existing ones are
    /// replaced in place without moving. Returns a copy of each input, in
    /// input order.
    pub fn save(&mut self, records: impl IntoIterator<Item = Record>) -> Vec<Record> {
        let mut saved = Vec::new();
        let mut inserted = 0usize;
        for record in records {
            saved.push(record.clone());
            if self.collection.upsert(record) == Upsert::Inserted {
                inserted += 1;
            }
        }
        tracing::trace!(
            entity = %self.name,
            inserted,
            updated = saved.len() - inserted,
            "save"
        );
        saved
    }

    /// Restore previously saved records. Same behaviour as [`save`](Self::save).
    pub fn load(&mut self, records: impl IntoIterator<Item = Record>) -> Vec<Record> {
        self.save(records)
    }

    /// `new_record` then `save` for each partial, as one batch
    pub fn create(&mut self, partials: impl IntoIterator<Item = Attributes>) -> Vec<Record> {
        let fresh: Vec<Record> = partials
            .into_iter()
            .map(|partial| self.new_record(partial))
            .collect();
        self.save(fresh)
    }

    /// Remove records by identifier
    ///
    /// Returns the removed records, one per identifier actually found.
    /// Survivors keep their relative order.
    pub fn delete_by_id<I>(&mut self, ids: I) -> Vec<Record>
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        let ids: Vec<Identifier> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Vec::new();
        }
        let removed: Vec<Record> = ids
            .iter()
            .filter_map(|id| self.collection.remove(id))
            .collect();
        tracing::trace!(
            entity = %self.name,
            requested = ids.len(),
            removed = removed.len(),
            "delete_by_id"
        );
        removed
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Look up records by identifier
    ///
    /// Result order follows request order. Unknown identifiers are skipped.
    pub fn find_by_id<I>(&self, ids: I) -> Vec<Record>
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        ids.into_iter()
            .filter_map(|id| self.collection.get(&id.into()).cloned())
            .collect()
    }

    /// Copy of every record, in sequence order
    pub fn get_all(&self) -> Vec<Record> {
        self.collection.iter().cloned().collect()
    }

    /// Number of records
    pub fn count(&self) -> usize {
        self.collection.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Check if an identifier is stored
    pub fn contains(&self, id: impl Into<Identifier>) -> bool {
        self.collection.contains(&id.into())
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Caller-directed linear scan
    ///
    /// `matcher` runs once per visited record and decides whether a copy of
    /// it joins the results. `stopper` runs after it on every visit and ends
    /// the scan when it returns true.
    ///
    /// ```
    /// use shapedb_core::{Record, SequentialPolicy};
    /// use shapedb_engine::{CollectionStore, FindOptions};
    ///
    /// let mut store = CollectionStore::new("n", "id", SequentialPolicy::new());
    /// store.save((0..10).map(|i| Record::new(i).with("v", i)));
    ///
    /// // Last two even values, scanning backwards
    /// let found = store.find(
    ///     |r, _| r.get("v").and_then(|v| v.as_i64()).map_or(false, |v| v % 2 == 0),
    ///     |ctx| ctx.results().len() == 2,
    ///     &FindOptions::new().reversed(true),
    /// );
    /// let ids: Vec<String> = found.iter().map(|r| r.id().to_string()).collect();
    /// assert_eq!(ids, vec!["8", "6"]);
    /// ```
    pub fn find<E, M, S>(
        &self,
        mut matcher: M,
        mut stopper: S,
        options: &FindOptions<E>,
    ) -> Vec<Record>
    where
        E: Clone,
        M: FnMut(&Record, &mut FindContext<E>) -> bool,
        S: FnMut(&FindContext<E>) -> bool,
    {
        self.find_with(&mut matcher, &mut stopper, options)
    }

    /// [`find`](Self::find) with strategy objects instead of closures
    pub fn find_with<E, M, S>(
        &self,
        matcher: &mut M,
        stopper: &mut S,
        options: &FindOptions<E>,
    ) -> Vec<Record>
    where
        E: Clone,
        M: Matcher<E> + ?Sized,
        S: Stopper<E> + ?Sized,
    {
        let results = search::scan(&self.collection, matcher, stopper, options);
        tracing::trace!(
            entity = %self.name,
            count = self.collection.len(),
            reverse = options.reverse,
            start = ?search::resolve_start(self.collection.len(), options),
            results = results.len(),
            "find"
        );
        results
    }

    /// Every record satisfying `predicate`, in sequence order
    pub fn filter(&self, mut predicate: impl FnMut(&Record) -> bool) -> Vec<Record> {
        let mut matcher = |record: &Record, _: &mut FindContext| predicate(record);
        self.find_with(&mut matcher, &mut NeverStop, &FindOptions::new())
    }

    /// Skip `offset` records in scan direction, then return up to `limit`
    pub fn page(&self, offset: usize, limit: usize, reverse: bool) -> Vec<Record> {
        if limit == 0 {
            return Vec::new();
        }
        let options = FindOptions::new().reversed(reverse).with_extra(0usize);
        self.find(
            |_, ctx: &mut FindContext<usize>| {
                if *ctx.extra() < offset {
                    *ctx.extra_mut() += 1;
                    false
                } else {
                    true
                }
            },
            |ctx| ctx.results().len() >= limit,
            &options,
        )
    }

    // =========================================================================
    // JSON boundary
    // =========================================================================

    /// Render a record as a JSON object, identifier under [`id_field`](Self::id_field)
    pub fn to_json(&self, record: &Record) -> Value {
        record.to_json(&self.id_field)
    }

    /// `get_all` rendered through [`to_json`](Self::to_json)
    pub fn export_json(&self) -> Vec<Value> {
        self.collection
            .iter()
            .map(|r| r.to_json(&self.id_field))
            .collect()
    }

    /// Parse JSON objects into records without storing them
    pub fn parse_json(&self, values: impl IntoIterator<Item = Value>) -> Result<Vec<Record>> {
        values
            .into_iter()
            .map(|v| Record::from_json(v, &self.name, &self.id_field))
            .collect()
    }

    /// Parse JSON objects and [`load`](Self::load) them
    ///
    /// The whole batch is parsed first; on error nothing is stored.
    pub fn load_json(&mut self, values: impl IntoIterator<Item = Value>) -> Result<Vec<Record>> {
        let records = self.parse_json(values)?;
        Ok(self.load(records))
    }
}

impl fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionStore")
            .field("name", &self.name)
            .field("id_field", &self.id_field)
            .field("count", &self.collection.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use shapedb_core::{Error, SequentialPolicy};

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn setup_store() -> CollectionStore {
        CollectionStore::new("contact", DEFAULT_ID_FIELD, SequentialPolicy::new())
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get_str("name").unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_new_record_does_not_touch_storage() {
        let mut store = setup_store();
        let record = store.new_record(attrs(json!({"name": "Ada"})));
        assert_eq!(record.id(), &Identifier::Int(1));
        assert_eq!(record.get_str("name"), Some("Ada"));
        assert!(record.get("email").is_none());
        assert_eq!(store.count(), 0);

        let next = store.new_record(Attributes::new());
        assert_eq!(next.id(), &Identifier::Int(2));
    }

    #[test]
    fn test_new_record_ignores_supplied_identifier() {
        let mut store = setup_store();
        let record = store.new_record(attrs(json!({"id": "mine", "name": "x"})));
        assert_eq!(record.id(), &Identifier::Int(1));
        assert!(record.get("id").is_none());
    }

    #[test]
    fn test_save_returns_copies_in_input_order() {
        let mut store = setup_store();
        let saved = store.save(vec![
            Record::new("b").with("name", "B"),
            Record::new("a").with("name", "A"),
        ]);
        assert_eq!(names(&saved), vec!["B", "A"]);
        assert_eq!(names(&store.get_all()), vec!["B", "A"]);
    }

    #[test]
    fn test_save_empty_batch() {
        let mut store = setup_store();
        assert!(store.save(Vec::new()).is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut store = setup_store();
        let created = store.create(vec![
            attrs(json!({"name": "A"})),
            attrs(json!({"name": "B"})),
            attrs(json!({"name": "C"})),
        ]);

        let mut b = created[1].clone();
        b.set("name", "B'");
        store.save([b]);

        assert_eq!(names(&store.get_all()), vec!["A", "B'", "C"]);
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_load_is_save() {
        let mut a = setup_store();
        let mut b = setup_store();
        let records = vec![Record::new(1).with("name", "x"), Record::new(1).with("name", "y")];
        assert_eq!(a.save(records.clone()), b.load(records));
        assert_eq!(a.get_all(), b.get_all());
        assert_eq!(names(&a.get_all()), vec!["y"]);
    }

    #[test]
    fn test_returned_values_are_isolated() {
        let mut store = setup_store();
        let mut saved = store.save([Record::new("a").with("name", "A")]);
        saved[0].set("name", "mutated");

        let mut all = store.get_all();
        all[0].set("name", "mutated too");

        let mut found = store.find_by_id(["a"]);
        found[0].set("name", "and again");

        assert_eq!(names(&store.get_all()), vec!["A"]);
    }

    #[test]
    fn test_get_all_is_fresh() {
        let mut store = setup_store();
        store.create(vec![attrs(json!({"name": "A"}))]);
        let first = store.get_all();
        let second = store.get_all();
        assert_eq!(first, second);
        assert_ne!(first.as_ptr(), second.as_ptr());
    }

    #[test]
    fn test_find_by_id_follows_request_order() {
        let mut store = setup_store();
        store.save(["x", "y", "z"].map(|id| Record::new(id).with("name", id)));

        let found = store.find_by_id(["z", "missing", "x"]);
        assert_eq!(names(&found), vec!["z", "x"]);
        assert!(store.find_by_id(Vec::<Identifier>::new()).is_empty());
    }

    #[test]
    fn test_delete_by_id() {
        let mut store = setup_store();
        store.save(["a", "b", "c", "d"].map(|id| Record::new(id).with("name", id)));

        let removed = store.delete_by_id(["c", "nope", "a"]);
        assert_eq!(names(&removed), vec!["c", "a"]);
        assert_eq!(names(&store.get_all()), vec!["b", "d"]);
        assert!(!store.contains("a"));
        assert!(store.find_by_id(["a"]).is_empty());

        assert!(store.delete_by_id(["nope"]).is_empty());
        assert!(store.delete_by_id(Vec::<&str>::new()).is_empty());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_filter_and_page() {
        let mut store = setup_store();
        store.save((0..10).map(|i| Record::new(i).with("v", i)));

        let evens = store.filter(|r| r.get("v").and_then(Value::as_i64).unwrap_or(1) % 2 == 0);
        assert_eq!(evens.len(), 5);

        let ids = |rs: Vec<Record>| rs.iter().map(|r| r.id().to_string()).collect::<Vec<_>>();
        assert_eq!(ids(store.page(0, 3, false)), vec!["0", "1", "2"]);
        assert_eq!(ids(store.page(8, 5, false)), vec!["8", "9"]);
        assert_eq!(ids(store.page(2, 2, true)), vec!["7", "6"]);
        assert!(store.page(0, 0, false).is_empty());
        assert!(store.page(20, 3, false).is_empty());
    }

    #[test]
    fn test_find_is_deterministic() {
        let mut store = setup_store();
        store.save((0..5).map(|i| Record::new(i).with("v", i)));
        let options = FindOptions::new().starting_at(1);
        let run = || store.find(|_, _| true, |ctx| ctx.results().len() == 2, &options);
        let first = run();
        assert_eq!(first, run());
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id(), &Identifier::Int(1));
    }

    #[test]
    fn test_json_round_trip() {
        let mut store = CollectionStore::new("user", "key", SequentialPolicy::new());
        store
            .load_json(vec![json!({"key": "u1", "name": "Ada"}), json!({"key": 2})])
            .unwrap();

        assert_eq!(
            store.export_json(),
            vec![json!({"key": "u1", "name": "Ada"}), json!({"key": 2})]
        );
    }

    #[test]
    fn test_load_json_is_all_or_nothing() {
        let mut store = setup_store();
        let err = store
            .load_json(vec![json!({"id": 1}), json!({"name": "no id"})])
            .unwrap_err();
        assert!(matches!(err, Error::MissingIdentifier { .. }));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_debug_impl() {
        let store = setup_store();
        let debug_str = format!("{:?}", store);
        assert!(debug_str.contains("CollectionStore"));
        assert!(debug_str.contains("contact"));
    }

    #[derive(Debug, Clone)]
    enum StoreOp {
        Save(u8, u8),
        Delete(Vec<u8>),
    }

    fn store_op() -> impl Strategy<Value = StoreOp> {
        prop_oneof![
            3 => (0u8..12, any::<u8>()).prop_map(|(id, v)| StoreOp::Save(id, v)),
            1 => prop::collection::vec(0u8..12, 0..4).prop_map(StoreOp::Delete),
        ]
    }

    proptest! {
        #[test]
        fn prop_store_matches_ordered_model(
            ops in prop::collection::vec(store_op(), 0..48),
            lookup in prop::collection::vec(0u8..16, 0..8),
        ) {
            let mut store = setup_store();
            let mut model: Vec<(i64, u8)> = Vec::new();

            for op in ops {
                match op {
                    StoreOp::Save(id, v) => {
                        let id = i64::from(id);
                        store.save([Record::new(id).with("v", v)]);
                        match model.iter_mut().find(|(m, _)| *m == id) {
                            Some(entry) => entry.1 = v,
                            None => model.push((id, v)),
                        }
                    }
                    StoreOp::Delete(ids) => {
                        let ids: Vec<i64> = ids.into_iter().map(i64::from).collect();
                        let removed = store.delete_by_id(ids.iter().copied());
                        let mut expected = Vec::new();
                        for id in &ids {
                            if let Some(pos) = model.iter().position(|(m, _)| m == id) {
                                expected.push(model.remove(pos).0);
                            }
                        }
                        let removed: Vec<Identifier> =
                            removed.iter().map(|r| r.id().clone()).collect();
                        prop_assert_eq!(
                            removed,
                            expected.into_iter().map(Identifier::Int).collect::<Vec<_>>()
                        );
                    }
                }
            }

            let expected: Vec<Record> = model
                .iter()
                .map(|(id, v)| Record::new(*id).with("v", *v))
                .collect();
            prop_assert_eq!(store.get_all(), expected.clone());
            prop_assert_eq!(store.count(), model.len());

            let lookup: Vec<i64> = lookup.into_iter().map(i64::from).collect();
            let found: Vec<Identifier> = store
                .find_by_id(lookup.iter().copied())
                .iter()
                .map(|r| r.id().clone())
                .collect();
            let wanted: Vec<Identifier> = lookup
                .iter()
                .filter(|id| model.iter().any(|(m, _)| m == *id))
                .map(|id| Identifier::Int(*id))
                .collect();
            prop_assert_eq!(found, wanted);

            let mut copies = store.get_all();
            for record in &mut copies {
                record.set("v", "mutated");
            }
            prop_assert_eq!(store.get_all(), expected);
        }
    }
}
