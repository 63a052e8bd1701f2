//! Buffered write operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use feature_model::{Feature, Filter, Value};

/// A single pending write awaiting commit.
///
/// Actions are value objects; the buffer owns them exclusively until they
/// are committed or discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    /// Insert a new feature. Its identifier is a client-assigned
    /// temporary one until the commit succeeds.
    Insert { feature: Feature },
    /// Set attribute values on the features selected by the filter.
    Update {
        type_name: String,
        filter: Filter,
        updates: BTreeMap<String, Value>,
    },
    /// Delete the features selected by the filter.
    Delete { type_name: String, filter: Filter },
}

impl Action {
    pub fn insert(feature: Feature) -> Self {
        Action::Insert { feature }
    }

    pub fn update(
        type_name: impl Into<String>,
        filter: Filter,
        updates: BTreeMap<String, Value>,
    ) -> Self {
        Action::Update {
            type_name: type_name.into(),
            filter,
            updates,
        }
    }

    pub fn delete(type_name: impl Into<String>, filter: Filter) -> Self {
        Action::Delete {
            type_name: type_name.into(),
            filter,
        }
    }

    /// Returns the feature type this action targets.
    pub fn type_name(&self) -> &str {
        match self {
            Action::Insert { feature } => feature.type_name(),
            Action::Update { type_name, .. } => type_name,
            Action::Delete { type_name, .. } => type_name,
        }
    }

    /// Returns the selection filter, if this action carries one.
    pub fn filter(&self) -> Option<&Filter> {
        match self {
            Action::Insert { .. } => None,
            Action::Update { filter, .. } => Some(filter),
            Action::Delete { filter, .. } => Some(filter),
        }
    }

    /// Returns whether this is an insert.
    pub fn is_insert(&self) -> bool {
        matches!(self, Action::Insert { .. })
    }
}
