//! Core types for ShapeDB
//!
//! This crate defines the values every other layer works with:
//! - Identifier: unique key of a record within its entity's store
//! - Record: identifier plus attribute map
//! - ShapeDecl / ShapeKind: entity shape declarations and their classification
//! - IdentifierPolicy / ShapeValidator: capabilities injected from outside
//! - Error: the crate-wide error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod identifier;
pub mod record;
pub mod shape;

pub use error::{Error, Result};
pub use identifier::{IdStrategy, Identifier, IdentifierPolicy, SequentialPolicy, UuidPolicy};
pub use record::{Attributes, Record};
pub use shape::{ObjectShape, ObjectShapeValidator, ShapeDecl, ShapeKind, ShapeValidator};
