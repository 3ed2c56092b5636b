//! ShapeDB: transient, schema-declared in-memory collections
//!
//! Declare entity types by shape, get one [`CollectionStore`] per valid
//! declaration, and query them with a caller-programmable linear scan.
//!
//! ```
//! use serde_json::json;
//! use shapedb::{FindOptions, Registry, ShapeDecl};
//!
//! let mut db = Registry::builder()
//!     .entity("contact", ShapeDecl::object(["name"]))
//!     .build()
//!     .unwrap();
//!
//! let contacts = db.store_mut("contact").unwrap();
//! contacts
//!     .load_json([json!({"id": "c1", "name": "Ada"}), json!({"id": "c2", "name": "Grace"})])
//!     .unwrap();
//!
//! let found = contacts.find(
//!     |r, _| r.get_str("name") == Some("Grace"),
//!     |_| false,
//!     &FindOptions::new(),
//! );
//! assert_eq!(found.len(), 1);
//! ```

#![warn(missing_docs)]

mod types;

pub use types::*;

pub use shapedb_core::{Error, Result};
pub use shapedb_engine::{CollectionStore, DEFAULT_ID_FIELD};
