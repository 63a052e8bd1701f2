//! Feature records with named attributes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::Value;

/// A single feature record.
///
/// A feature belongs to exactly one feature type and carries an
/// identifier plus a set of named attributes. Until the feature has been
/// committed to the remote service the identifier is a client-assigned
/// temporary one; afterwards the service-assigned identifier applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    id: String,
    type_name: String,
    /// Ordered so the serialized document is deterministic.
    attributes: BTreeMap<String, Value>,
}

impl Feature {
    /// Creates a feature with no attributes.
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Returns the feature identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the feature type this record belongs to.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the attribute value, if set.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns all attributes in name order.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    /// Builder-style variant of [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set_attribute(name, value);
        self
    }
}
