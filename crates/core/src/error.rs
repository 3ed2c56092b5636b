//! Error types for ShapeDB
//!
//! The store's read/write operations are infallible: a missing identifier is
//! absence in the result, not an error. Errors only arise at the edges where
//! untyped data enters the system (JSON records, fixtures, configuration) or
//! where caller-supplied seeding code fails.

use thiserror::Error;

/// Result type alias for ShapeDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ShapeDB operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A record value that was expected to be a JSON object was not
    #[error("record for entity '{entity}' is not a JSON object")]
    NotAnObject {
        /// Entity type the record was destined for
        entity: String,
    },

    /// A record lacks its identifier field
    #[error("record for entity '{entity}' is missing identifier field '{field}'")]
    MissingIdentifier {
        /// Entity type the record was destined for
        entity: String,
        /// Name of the identifier field
        field: String,
    },

    /// The identifier field holds something other than a string or integer
    #[error("record for entity '{entity}' has invalid identifier in '{field}': {found}")]
    InvalidIdentifier {
        /// Entity type the record was destined for
        entity: String,
        /// Name of the identifier field
        field: String,
        /// The offending value, rendered as JSON
        found: String,
    },

    /// No store is registered under this entity name
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Configuration could not be parsed or is malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// A seeding callback reported failure
    #[error("seeding failed: {0}")]
    Seed(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a seeding error, for use inside seeding callbacks
    pub fn seed(msg: impl Into<String>) -> Self {
        Error::Seed(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
