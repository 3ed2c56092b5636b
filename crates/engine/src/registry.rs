//! Registry: one collection store per declared entity type
//!
//! The registry is assembled once from named shape declarations and is
//! fixed in structure afterwards; the stores it holds stay mutable in
//! content. Declarations the [`ShapeValidator`] rejects are dropped without
//! error and appear in neither map.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use shapedb_core::{Identifier, SequentialPolicy, ShapeDecl};
//! use shapedb_engine::{EntityDecl, Registry};
//!
//! let registry = Registry::builder()
//!     .entity("contact", EntityDecl::new(ShapeDecl::object(["name"])).policy(SequentialPolicy::new()))
//!     .entity("not_an_entity", json!({"type": "string"}))
//!     .seed(|reg| {
//!         let contacts = reg.store_mut("contact")?;
//!         contacts.load_json([json!({"id": 1, "name": "Ada"})])?;
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(registry.names().collect::<Vec<_>>(), vec!["contact"]);
//! assert!(registry.store("contact").unwrap().contains(Identifier::Int(1)));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use shapedb_core::{
    Error, IdentifierPolicy, ObjectShapeValidator, Record, Result, ShapeDecl, ShapeValidator,
    UuidPolicy,
};

use crate::store::{CollectionStore, DEFAULT_ID_FIELD};

/// Seeding callback, run once after every store exists
pub type SeedFn = Box<dyn FnOnce(&mut Registry) -> Result<()>>;

/// Declaration of one entity type
///
/// A bare [`ShapeDecl`] (or JSON value) converts into a declaration with the
/// default identifier field and [`UuidPolicy`].
pub struct EntityDecl {
    /// Shape declaration
    pub shape: ShapeDecl,
    /// Identifier field name in the JSON form of a record
    pub id_field: String,
    /// Identifier allocation for this entity
    pub policy: Box<dyn IdentifierPolicy>,
}

impl EntityDecl {
    /// Declaration with default identifier field and policy
    pub fn new(shape: ShapeDecl) -> Self {
        Self {
            shape,
            id_field: DEFAULT_ID_FIELD.to_string(),
            policy: Box::new(UuidPolicy),
        }
    }

    /// Set the identifier field name (builder pattern)
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Set the identifier policy (builder pattern)
    pub fn policy(mut self, policy: impl IdentifierPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }
}

impl From<ShapeDecl> for EntityDecl {
    fn from(shape: ShapeDecl) -> Self {
        EntityDecl::new(shape)
    }
}

impl From<Value> for EntityDecl {
    fn from(value: Value) -> Self {
        EntityDecl::new(ShapeDecl::new(value))
    }
}

impl fmt::Debug for EntityDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDecl")
            .field("shape", &self.shape)
            .field("id_field", &self.id_field)
            .finish_non_exhaustive()
    }
}

/// Accumulates declarations, then [`build`](Self::build)s the registry
pub struct RegistryBuilder {
    entities: BTreeMap<String, EntityDecl>,
    validator: Box<dyn ShapeValidator>,
    seed: Option<SeedFn>,
}

impl RegistryBuilder {
    /// Empty builder using [`ObjectShapeValidator`]
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            validator: Box::new(ObjectShapeValidator),
            seed: None,
        }
    }

    /// Declare an entity type. A repeated name replaces the earlier declaration.
    pub fn entity(mut self, name: impl Into<String>, decl: impl Into<EntityDecl>) -> Self {
        self.entities.insert(name.into(), decl.into());
        self
    }

    /// Replace the shape validator
    pub fn validator(mut self, validator: impl ShapeValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Set the seeding callback
    pub fn seed(mut self, seed: impl FnOnce(&mut Registry) -> Result<()> + 'static) -> Self {
        self.seed = Some(Box::new(seed));
        self
    }

    /// Build the registry, then run the seeding callback if one was set
    pub fn build(self) -> Result<Registry> {
        let mut stores = BTreeMap::new();
        let mut shapes = BTreeMap::new();

        for (name, decl) in self.entities {
            if !self.validator.is_object_shape(&decl.shape) {
                tracing::debug!(entity = %name, "Excluding entity: not an object shape");
                continue;
            }
            tracing::debug!(entity = %name, id_field = %decl.id_field, "Registering store");
            let store = CollectionStore::with_boxed_policy(name.clone(), decl.id_field, decl.policy);
            stores.insert(name.clone(), store);
            shapes.insert(name, decl.shape);
        }

        let mut registry = Registry { stores, shapes };
        if let Some(seed) = self.seed {
            seed(&mut registry)?;
        }
        Ok(registry)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Named collection stores plus their originating shape declarations
pub struct Registry {
    stores: BTreeMap<String, CollectionStore>,
    shapes: BTreeMap<String, ShapeDecl>,
}

impl Registry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Store for an entity, if registered
    pub fn store(&self, name: &str) -> Option<&CollectionStore> {
        self.stores.get(name)
    }

    /// Mutable store for an entity
    ///
    /// Returns [`Error::UnknownEntity`] so seeding code can use `?`.
    pub fn store_mut(&mut self, name: &str) -> Result<&mut CollectionStore> {
        self.stores
            .get_mut(name)
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    /// Original shape declaration of an entity
    pub fn shape(&self, name: &str) -> Option<&ShapeDecl> {
        self.shapes.get(name)
    }

    /// Entity name -> store
    pub fn stores(&self) -> &BTreeMap<String, CollectionStore> {
        &self.stores
    }

    /// Entity name -> shape declaration
    pub fn shapes(&self) -> &BTreeMap<String, ShapeDecl> {
        &self.shapes
    }

    /// Registered entity names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stores.keys().map(String::as_str)
    }

    /// Number of registered entity types
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Check if no entity type was registered
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Load fixture records
    ///
    /// `fixtures` maps entity names to arrays of JSON records. Every record
    /// of every entity is parsed before anything is stored, so a malformed
    /// fixture leaves all stores untouched. Returns the number of records
    /// loaded.
    pub fn load_fixtures(&mut self, fixtures: Value) -> Result<usize> {
        let Value::Object(entries) = fixtures else {
            return Err(Error::config("fixtures must be a JSON object"));
        };

        let mut parsed: Vec<(String, Vec<Record>)> = Vec::with_capacity(entries.len());
        for (name, records) in entries {
            let store = self
                .stores
                .get(&name)
                .ok_or_else(|| Error::UnknownEntity(name.clone()))?;
            let Value::Array(records) = records else {
                return Err(Error::config(format!(
                    "fixtures for '{}' must be an array",
                    name
                )));
            };
            let records = store.parse_json(records)?;
            parsed.push((name, records));
        }

        let mut loaded = 0;
        for (name, records) in parsed {
            if let Some(store) = self.stores.get_mut(&name) {
                loaded += store.load(records).len();
            }
        }
        tracing::debug!(records = loaded, "Loaded fixtures");
        Ok(loaded)
    }

    /// Every store's records as JSON, keyed by entity name
    pub fn export_json(&self) -> Value {
        let map: serde_json::Map<String, Value> = self
            .stores
            .iter()
            .map(|(name, store)| (name.clone(), Value::Array(store.export_json())))
            .collect();
        Value::Object(map)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("stores", &self.stores)
            .finish()
    }
}
