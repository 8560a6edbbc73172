//! Record type registry
//!
//! Holds frozen record types by name. Types are registered once; a second
//! registration under the same name is rejected.
//!
//! Declarations can also be described as data ([`TypeDeclaration`]) so a
//! catalog of record types can be loaded from JSON.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Json;

use crate::observability::Logger;

use super::coercion::FieldType;
use super::errors::{RecordError, RecordResult};
use super::types::RecordType;
use super::value::Value;

/// One field of a declarative record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Absent means required; JSON `null` is an explicit `None` default
    #[serde(
        default,
        deserialize_with = "explicit_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Json>,
}

/// A record type described as data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub fields: Vec<FieldDeclaration>,
}

fn explicit_default<'de, D>(deserializer: D) -> Result<Option<Json>, D::Error>
where
    D: Deserializer<'de>,
{
    Json::deserialize(deserializer).map(Some)
}

impl TypeDeclaration {
    /// Builds the record type this declaration describes.
    pub fn build(&self) -> RecordResult<Arc<RecordType>> {
        let mut builder = RecordType::builder(&self.name);
        for field in &self.fields {
            builder = match &field.default {
                None => builder.field(&field.name, field.field_type),
                Some(json) => {
                    let default = Value::try_from(json).map_err(|e| {
                        RecordError::invalid_declaration(
                            &self.name,
                            format!("default of field '{}': {}", field.name, e.reason),
                        )
                    })?;
                    builder.field_with_default(&field.name, field.field_type, default)
                }
            };
        }
        builder.build()
    }
}

/// Registry of record types, keyed by type name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, Arc<RecordType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and registers every declaration, in order.
    pub fn from_declarations(declarations: &[TypeDeclaration]) -> RecordResult<Self> {
        let mut registry = Self::new();
        for declaration in declarations {
            registry.register(declaration.build()?)?;
        }

        let count = registry.len().to_string();
        Logger::info("CATALOG_LOADED", &[("types", count.as_str())]);
        Ok(registry)
    }

    /// Registers a record type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDeclaration` if a type with the same name is already
    /// registered.
    pub fn register(&mut self, record_type: Arc<RecordType>) -> RecordResult<()> {
        if self.types.contains_key(record_type.name()) {
            return Err(RecordError::invalid_declaration(
                record_type.name(),
                "a record type with this name is already registered",
            ));
        }
        self.types
            .insert(record_type.name().to_string(), record_type);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RecordType>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered types, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RecordType>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
