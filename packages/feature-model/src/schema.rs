//! Feature type schemas and schema resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::value::ValueType;

/// Schema resolution errors.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    /// Feature type not known to the provider
    #[error("Unknown feature type '{0}'")]
    UnknownFeatureType(String),
}

/// A field declared by a feature type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: ValueType,
}

/// Schema of one feature type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTypeSchema {
    /// Feature type name
    pub type_name: String,
    /// Namespace the type's elements live in; declared on the outbound
    /// transaction document for every referenced type
    pub namespace_uri: String,
    /// Declared fields
    pub fields: Vec<FieldDef>,
}

impl FeatureTypeSchema {
    /// Creates a schema with no fields.
    pub fn new(type_name: impl Into<String>, namespace_uri: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace_uri: namespace_uri.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field declaration.
    pub fn with_field(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
        });
        self
    }
}

/// Resolves feature type names to schemas.
pub trait SchemaProvider: Send + Sync {
    /// Returns the schema for a feature type.
    fn schema(&self, type_name: &str) -> Result<FeatureTypeSchema, SchemaError>;
}

/// In-memory schema registry.
#[derive(Debug, Default, Clone)]
pub struct StaticSchemaProvider {
    schemas: HashMap<String, FeatureTypeSchema>,
}

impl StaticSchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema, replacing any previous one for the same type.
    pub fn insert(&mut self, schema: FeatureTypeSchema) {
        self.schemas.insert(schema.type_name.clone(), schema);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_schema(mut self, schema: FeatureTypeSchema) -> Self {
        self.insert(schema);
        self
    }
}

impl SchemaProvider for StaticSchemaProvider {
    fn schema(&self, type_name: &str) -> Result<FeatureTypeSchema, SchemaError> {
        self.schemas
            .get(type_name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownFeatureType(type_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_provider_resolves_registered_types() {
        let provider = StaticSchemaProvider::new().with_schema(
            FeatureTypeSchema::new("roads", "http://example.com/roads")
                .with_field("lanes", ValueType::I64),
        );

        let schema = provider.schema("roads").unwrap();
        assert_eq!(schema.namespace_uri, "http://example.com/roads");
        assert_eq!(schema.fields.len(), 1);

        assert!(matches!(
            provider.schema("rivers"),
            Err(SchemaError::UnknownFeatureType(name)) if name == "rivers"
        ));
    }
}
