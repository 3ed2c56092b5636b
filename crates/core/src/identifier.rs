//! Record identifiers and the policies that allocate them
//!
//! An [`Identifier`] names exactly one record within one entity type's store.
//! Allocation is delegated to an [`IdentifierPolicy`] handed to each store at
//! construction time, so stores can run with deterministic identifiers in
//! tests and random ones elsewhere.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a record within its entity's store
///
/// Serializes untagged: a JSON string or a JSON integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Integer identifier
    Int(i64),
    /// String identifier
    Str(String),
}

impl Identifier {
    /// Read an identifier out of a JSON value
    ///
    /// Strings and integers are accepted. `entity` and `field` only feed the
    /// error message.
    pub fn from_json(value: &serde_json::Value, entity: &str, field: &str) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Ok(Identifier::Str(s.clone())),
            serde_json::Value::Number(n) => {
                n.as_i64()
                    .map(Identifier::Int)
                    .ok_or_else(|| Error::InvalidIdentifier {
                        entity: entity.to_string(),
                        field: field.to_string(),
                        found: value.to_string(),
                    })
            }
            other => Err(Error::InvalidIdentifier {
                entity: entity.to_string(),
                field: field.to_string(),
                found: other.to_string(),
            }),
        }
    }

    /// Render as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Identifier::Int(i) => serde_json::Value::from(*i),
            Identifier::Str(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// String form, if this is a string identifier
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Identifier::Str(s) => Some(s),
            Identifier::Int(_) => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(i) => write!(f, "{}", i),
            Identifier::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Str(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::Str(s)
    }
}

impl From<i64> for Identifier {
    fn from(i: i64) -> Self {
        Identifier::Int(i)
    }
}

impl From<i32> for Identifier {
    fn from(i: i32) -> Self {
        Identifier::Int(i64::from(i))
    }
}

impl From<&Identifier> for Identifier {
    fn from(id: &Identifier) -> Self {
        id.clone()
    }
}

impl From<Uuid> for Identifier {
    fn from(u: Uuid) -> Self {
        Identifier::Str(u.hyphenated().to_string())
    }
}

// =============================================================================
// Identifier policies
// =============================================================================

/// Produces identifiers for a named entity type
///
/// Returned values must be unique within the entity's store; the store relies
/// on this and does not check it. A repeated identifier turns `create` into an
/// update of the existing record.
pub trait IdentifierPolicy {
    /// Allocate the next identifier for `entity`
    fn next(&mut self, entity: &str) -> Identifier;
}

impl<F> IdentifierPolicy for F
where
    F: FnMut(&str) -> Identifier,
{
    fn next(&mut self, entity: &str) -> Identifier {
        self(entity)
    }
}

/// Random v4 UUIDs, rendered as hyphenated strings. The default policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidPolicy;

impl IdentifierPolicy for UuidPolicy {
    fn next(&mut self, _entity: &str) -> Identifier {
        Identifier::from(Uuid::new_v4())
    }
}

/// Deterministic integer identifiers: `start`, `start + 1`, ...
///
/// Once `i64::MAX` has been handed out the sequence is exhausted and further
/// identifiers come from [`UuidPolicy`], which cannot collide with an integer.
#[derive(Debug, Clone)]
pub struct SequentialPolicy {
    next: Option<i64>,
}

impl SequentialPolicy {
    /// Sequence starting at 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Sequence starting at `start`
    pub fn starting_at(start: i64) -> Self {
        Self { next: Some(start) }
    }
}

impl Default for SequentialPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierPolicy for SequentialPolicy {
    fn next(&mut self, entity: &str) -> Identifier {
        match self.next {
            Some(id) => {
                self.next = id.checked_add(1);
                Identifier::Int(id)
            }
            None => UuidPolicy.next(entity),
        }
    }
}

/// Serializable selector for the stock policies
///
/// Used by declarative configuration, where a closure cannot be named.
///
/// ```
/// use shapedb_core::IdStrategy;
///
/// let s: IdStrategy = serde_json::from_str(r#"{"sequential": {"start": 100}}"#).unwrap();
/// assert_eq!(s, IdStrategy::Sequential { start: 100 });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// [`UuidPolicy`]
    #[default]
    Uuid,
    /// [`SequentialPolicy`]
    Sequential {
        /// First identifier handed out
        #[serde(default = "default_start")]
        start: i64,
    },
}

fn default_start() -> i64 {
    1
}

impl IdStrategy {
    /// Build the policy this strategy names
    pub fn into_policy(self) -> Box<dyn IdentifierPolicy> {
        match self {
            IdStrategy::Uuid => Box::new(UuidPolicy),
            IdStrategy::Sequential { start } => Box::new(SequentialPolicy::starting_at(start)),
        }
    }
}
