//! Storage layer for ShapeDB
//!
//! Holds one entity type's records in a keyed map plus an insertion-ordered
//! sequence. Identifier allocation, copying at the API boundary and search
//! live in the engine crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;

pub use collection::{Collection, Upsert};
