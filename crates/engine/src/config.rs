//! Declarative registry configuration
//!
//! A registry can be described as data, in JSON or TOML, instead of through
//! the builder. Each entity is either a raw shape declaration or an extended
//! form that also names the identifier field and a stock identifier strategy:
//!
//! ```toml
//! [entities.contact]
//! type = "object"
//!
//! [entities.order]
//! id_field = "order_id"
//! id_strategy = { sequential = { start = 1000 } }
//! shape = { type = "object", properties = { total = { type = "number" } } }
//!
//! [[fixtures.contact]]
//! id = "c1"
//! name = "Ada"
//! ```
//!
//! `fixtures`, when present, is loaded as the seeding step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shapedb_core::{IdStrategy, Result, ShapeDecl};

use crate::registry::{EntityDecl, Registry};
use crate::store::DEFAULT_ID_FIELD;

/// Shape plus identifier settings
///
/// Only these keys are accepted, so a raw declaration that happens to carry
/// a `shape` key is never mistaken for this form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtendedEntity {
    /// Shape declaration
    pub shape: ShapeDecl,
    /// Identifier field name
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Identifier strategy
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

/// Configuration of one entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityConfig {
    /// Shape plus identifier settings
    Extended(ExtendedEntity),
    /// Bare shape declaration with default identifier settings
    Raw(ShapeDecl),
}

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

impl EntityConfig {
    /// Convert into a builder declaration
    pub fn into_decl(self) -> EntityDecl {
        match self {
            EntityConfig::Extended(ExtendedEntity {
                shape,
                id_field,
                id_strategy,
            }) => EntityDecl {
                shape,
                id_field,
                policy: id_strategy.into_policy(),
            },
            EntityConfig::Raw(shape) => EntityDecl::new(shape),
        }
    }
}

/// Configuration of a whole registry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Entity name -> configuration
    #[serde(default)]
    pub entities: BTreeMap<String, EntityConfig>,
    /// Records to load once the stores exist, keyed by entity name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<Value>,
}

impl RegistryConfig {
    /// Parse from a JSON document
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Registry {
    /// Build a registry from configuration, loading any fixtures as the seed
    pub fn from_config(config: RegistryConfig) -> Result<Registry> {
        let mut builder = Registry::builder();
        for (name, entity) in config.entities {
            builder = builder.entity(name, entity.into_decl());
        }
        if let Some(fixtures) = config.fixtures {
            builder = builder.seed(move |reg| reg.load_fixtures(fixtures).map(|_| ()));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shapedb_core::{Error, Identifier, ObjectShapeValidator, ShapeValidator};

    #[test]
    fn test_entity_config_raw_and_extended() {
        let raw: EntityConfig = serde_json::from_value(json!({"type": "object"})).unwrap();
        assert_eq!(
            raw,
            EntityConfig::Raw(ShapeDecl::new(json!({"type": "object"})))
        );

        let extended: EntityConfig =
            serde_json::from_value(json!({"shape": {"type": "object"}, "id_field": "key"}))
                .unwrap();
        assert_eq!(
            extended,
            EntityConfig::Extended(ExtendedEntity {
                shape: ShapeDecl::new(json!({"type": "object"})),
                id_field: "key".to_string(),
                id_strategy: IdStrategy::Uuid,
            })
        );
    }

    #[test]
    fn test_raw_shape_with_shape_key_stays_raw() {
        let value = json!({
            "type": "object",
            "shape": {"type": "string"},
            "properties": {"shape": {}}
        });
        let config: EntityConfig = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(config, EntityConfig::Raw(ShapeDecl::new(value)));

        let decl = config.into_decl();
        assert!(ObjectShapeValidator.is_object_shape(&decl.shape));
    }

    #[test]
    fn test_sequential_start_at_max_does_not_overflow() {
        let config = RegistryConfig::from_json_str(
            r#"{
                "entities": {
                    "counter": {
                        "shape": {"type": "object"},
                        "id_strategy": {"sequential": {"start": 9223372036854775807}}
                    }
                }
            }"#,
        )
        .unwrap();
        let mut registry = Registry::from_config(config).unwrap();
        let counters = registry.store_mut("counter").unwrap();

        let first = counters.create([serde_json::Map::new()]);
        let rest = counters.create([serde_json::Map::new(), serde_json::Map::new()]);
        assert_eq!(first[0].id(), &Identifier::Int(i64::MAX));
        assert!(rest.iter().all(|r| r.id().as_str().is_some()));
        assert_ne!(rest[0].id(), rest[1].id());
        assert_eq!(counters.count(), 3);
    }

    #[test]
    fn test_registry_from_json_config() {
        let config = RegistryConfig::from_json_str(
            r#"{
                "entities": {
                    "contact": {"type": "object", "properties": {"name": {}}},
                    "counter": {"shape": {"type": "object"}, "id_strategy": {"sequential": {"start": 7}}},
                    "label": {"type": "string"}
                },
                "fixtures": {"contact": [{"id": "c1", "name": "Ada"}]}
            }"#,
        )
        .unwrap();

        let mut registry = Registry::from_config(config).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["contact", "counter"]);
        assert_eq!(registry.store("contact").unwrap().count(), 1);

        let created = registry
            .store_mut("counter")
            .unwrap()
            .create([serde_json::Map::new()]);
        assert_eq!(created[0].id(), &Identifier::Int(7));
    }

    #[test]
    fn test_registry_from_toml_config() {
        let config = RegistryConfig::from_toml_str(
            r#"
            [entities.contact]
            type = "object"

            [entities.order]
            id_field = "order_id"
            id_strategy = { sequential = { start = 1000 } }
            shape = { type = "object", properties = { total = { type = "number" } } }

            [[fixtures.order]]
            order_id = 1
            total = 9.5
            "#,
        )
        .unwrap();

        let registry = Registry::from_config(config).unwrap();
        assert_eq!(registry.len(), 2);
        let orders = registry.store("order").unwrap();
        assert_eq!(orders.id_field(), "order_id");
        assert_eq!(orders.export_json(), vec![json!({"order_id": 1, "total": 9.5})]);
    }

    #[test]
    fn test_bad_config_is_config_error() {
        let err = RegistryConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = RegistryConfig::from_toml_str("entities = 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bad_fixtures_fail_build() {
        let config = RegistryConfig {
            entities: BTreeMap::new(),
            fixtures: Some(json!({"ghost": []})),
        };
        assert_eq!(
            Registry::from_config(config).unwrap_err(),
            Error::UnknownEntity("ghost".to_string())
        );
    }
}
