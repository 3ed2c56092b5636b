//! Public types for the ShapeDB API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Record and identifier types
// ============================================================================

pub use shapedb_core::{Attributes, Identifier, Record};

// Identifier allocation
pub use shapedb_core::{IdStrategy, IdentifierPolicy, SequentialPolicy, UuidPolicy};

// Shape declarations
pub use shapedb_core::{ObjectShape, ObjectShapeValidator, ShapeDecl, ShapeKind, ShapeValidator};

// ============================================================================
// Search types
// ============================================================================

pub use shapedb_engine::search::{
    FindContext, FindOptions, MatchAll, Matcher, NeverStop, StopAfter, Stopper,
};

// ============================================================================
// Registry and configuration
// ============================================================================

pub use shapedb_engine::{
    EntityConfig, EntityDecl, ExtendedEntity, Registry, RegistryBuilder, RegistryConfig, SeedFn,
};
