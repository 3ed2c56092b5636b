//! Shape declarations and their classification
//!
//! A shape declaration describes an entity's attribute structure. ShapeDB does
//! not validate records against it; the declaration is classified once, when
//! the registry is built, to decide whether the entity gets a store at all.
//!
//! # Accepted form
//!
//! The stock classifier recognizes JSON-Schema-style object declarations:
//!
//! ```json
//! { "type": "object", "properties": { "name": { "type": "string" } } }
//! ```
//!
//! `properties` is optional but must be an object when present.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Raw shape declaration, kept verbatim for introspection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeDecl(Value);

impl ShapeDecl {
    /// Wrap a JSON value
    pub fn new(value: Value) -> Self {
        ShapeDecl(value)
    }

    /// Declaration of an object shape with the given property names, each
    /// left untyped
    pub fn object<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let props: serde_json::Map<String, Value> = properties
            .into_iter()
            .map(|p| (p.into(), Value::Object(serde_json::Map::new())))
            .collect();
        let mut decl = serde_json::Map::new();
        decl.insert("type".to_string(), Value::String("object".to_string()));
        decl.insert("properties".to_string(), Value::Object(props));
        ShapeDecl(Value::Object(decl))
    }

    /// The underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the underlying JSON value
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ShapeDecl {
    fn from(v: Value) -> Self {
        ShapeDecl(v)
    }
}

impl fmt::Display for ShapeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An object-shaped declaration, reduced to what the engine needs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectShape {
    /// Declared property names, sorted
    pub properties: Vec<String>,
}

/// Classification of a shape declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// An object schema: the entity gets a store
    Object(ObjectShape),
    /// Anything else: the entity is excluded
    Other,
}

impl ShapeKind {
    /// Classify a declaration
    pub fn classify(decl: &ShapeDecl) -> Self {
        let Value::Object(map) = decl.as_value() else {
            return ShapeKind::Other;
        };
        if map.get("type").and_then(Value::as_str) != Some("object") {
            return ShapeKind::Other;
        }
        let properties = match map.get("properties") {
            None => Vec::new(),
            Some(Value::Object(props)) => {
                let mut names: Vec<String> = props.keys().cloned().collect();
                names.sort();
                names
            }
            Some(_) => return ShapeKind::Other,
        };
        ShapeKind::Object(ObjectShape { properties })
    }

    /// Whether this is an object shape
    pub fn is_object(&self) -> bool {
        matches!(self, ShapeKind::Object(_))
    }
}

/// Decides whether a declaration is an object-shaped schema
pub trait ShapeValidator {
    /// `true` if `decl` should become a store
    fn is_object_shape(&self, decl: &ShapeDecl) -> bool;
}

impl<F> ShapeValidator for F
where
    F: Fn(&ShapeDecl) -> bool,
{
    fn is_object_shape(&self, decl: &ShapeDecl) -> bool {
        self(decl)
    }
}

/// Default validator backed by [`ShapeKind::classify`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectShapeValidator;

impl ShapeValidator for ObjectShapeValidator {
    fn is_object_shape(&self, decl: &ShapeDecl) -> bool {
        ShapeKind::classify(decl).is_object()
    }
}
