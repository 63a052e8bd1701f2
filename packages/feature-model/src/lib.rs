//! Data model for features exchanged with a remote feature service.
//!
//! Provides scalar values, features with named attributes, selection
//! filters, and per-type schemas with namespace information.

pub mod feature;
pub mod filter;
pub mod schema;
pub mod value;

pub use feature::Feature;
pub use filter::Filter;
pub use schema::{FeatureTypeSchema, FieldDef, SchemaError, SchemaProvider, StaticSchemaProvider};
pub use value::{Value, ValueType};
