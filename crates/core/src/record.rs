//! Records: an identifier plus declared attributes
//!
//! Attributes are kept as a JSON object map. Completeness against the
//! entity's shape is not enforced: a freshly allocated record may carry only
//! some of its declared attributes.

use crate::error::{Error, Result};
use crate::identifier::Identifier;
use serde_json::{Map, Value};

/// Attribute map of a record, without the identifier
pub type Attributes = Map<String, Value>;

/// A stored entity value
///
/// The identifier is fixed at construction. Cloning produces a fully
/// independent copy; stores hand out clones only.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: Identifier,
    attributes: Attributes,
}

impl Record {
    /// Create a record with no attributes
    pub fn new(id: impl Into<Identifier>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    /// Create a record from an identifier and an attribute map
    pub fn with_attributes(id: impl Into<Identifier>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Set an attribute (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The record's identifier
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// All attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable access to the attributes
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Look up one attribute
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Look up a string attribute
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Set one attribute, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Remove one attribute, returning it
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// Split into identifier and attributes
    pub fn into_parts(self) -> (Identifier, Attributes) {
        (self.id, self.attributes)
    }

    /// Parse a record from a JSON object
    ///
    /// The identifier is read from (and removed from) `id_field`.
    pub fn from_json(value: Value, entity: &str, id_field: &str) -> Result<Self> {
        let Value::Object(mut attributes) = value else {
            return Err(Error::NotAnObject {
                entity: entity.to_string(),
            });
        };
        let raw_id = attributes
            .remove(id_field)
            .ok_or_else(|| Error::MissingIdentifier {
                entity: entity.to_string(),
                field: id_field.to_string(),
            })?;
        let id = Identifier::from_json(&raw_id, entity, id_field)?;
        Ok(Self { id, attributes })
    }

    /// Render as one JSON object with the identifier under `id_field`
    ///
    /// An attribute that shares the identifier field's name is shadowed.
    pub fn to_json(&self, id_field: &str) -> Value {
        let mut object = self.attributes.clone();
        object.insert(id_field.to_string(), self.id.to_json());
        Value::Object(object)
    }
}
