//! Engine layer for ShapeDB
//!
//! This crate provides:
//! - CollectionStore: create/read/update/delete for one entity type
//! - search: the caller-programmable linear scan behind `find`
//! - Registry: one store per declared entity type, with optional seeding
//! - config: declarative (JSON/TOML) registry configuration
//!
//! Everything is synchronous and single-threaded. Stores are plain owned
//! values; writes take `&mut self`, reads and scans take `&self`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod registry;
pub mod search;
pub mod store;

pub use config::{EntityConfig, ExtendedEntity, RegistryConfig};
pub use registry::{EntityDecl, Registry, RegistryBuilder, SeedFn};
pub use search::{FindContext, FindOptions, MatchAll, Matcher, NeverStop, StopAfter, Stopper};
pub use store::{CollectionStore, DEFAULT_ID_FIELD};
