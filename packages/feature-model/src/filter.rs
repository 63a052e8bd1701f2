//! Selection filters over feature records.

use serde::{Deserialize, Serialize};

use crate::feature::Feature;
use crate::value::Value;

/// Predicate selecting features for an update or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Matches every feature.
    SelectAll,
    /// Matches no feature. Operations carrying this filter are no-ops.
    SelectNone,
    /// Matches features whose identifier is in the given set.
    Ids { ids: Vec<String> },
    /// Matches features whose attribute equals the given value.
    Equals { field: String, value: Value },
}

impl Filter {
    /// Convenience constructor for a single-identifier filter.
    pub fn id(id: impl Into<String>) -> Self {
        Filter::Ids {
            ids: vec![id.into()],
        }
    }

    /// Evaluates this filter against a feature.
    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            Filter::SelectAll => true,
            Filter::SelectNone => false,
            Filter::Ids { ids } => ids.iter().any(|id| id == feature.id()),
            Filter::Equals { field, value } => feature.attribute(field) == Some(value),
        }
    }

    /// Returns the identifier if this is an identifier filter naming
    /// exactly one identifier.
    pub fn single_id(&self) -> Option<&str> {
        match self {
            Filter::Ids { ids } if ids.len() == 1 => Some(&ids[0]),
            _ => None,
        }
    }

    /// Returns whether this is the universal "select nothing" filter.
    pub fn is_select_none(&self) -> bool {
        matches!(self, Filter::SelectNone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn road() -> Feature {
        Feature::new("roads", "roads.7").with_attribute("lanes", Value::I64(2))
    }

    #[test]
    fn select_all_and_none() {
        assert!(Filter::SelectAll.matches(&road()));
        assert!(!Filter::SelectNone.matches(&road()));
        assert!(Filter::SelectNone.is_select_none());
        assert!(!Filter::SelectAll.is_select_none());
    }

    #[test]
    fn id_filter_matches_by_identifier() {
        assert!(Filter::id("roads.7").matches(&road()));
        assert!(!Filter::id("roads.8").matches(&road()));

        let multi = Filter::Ids {
            ids: vec!["roads.7".into(), "roads.8".into()],
        };
        assert!(multi.matches(&road()));
    }

    #[test]
    fn single_id_only_for_one_identifier() {
        assert_eq!(Filter::id("roads.7").single_id(), Some("roads.7"));

        let multi = Filter::Ids {
            ids: vec!["a".into(), "b".into()],
        };
        assert_eq!(multi.single_id(), None);
        assert_eq!(Filter::SelectAll.single_id(), None);
    }

    #[test]
    fn equals_filter_compares_attribute() {
        let eq = Filter::Equals {
            field: "lanes".into(),
            value: Value::I64(2),
        };
        assert!(eq.matches(&road()));

        let ne = Filter::Equals {
            field: "lanes".into(),
            value: Value::I64(4),
        };
        assert!(!ne.matches(&road()));

        let missing = Filter::Equals {
            field: "surface".into(),
            value: Value::from("asphalt"),
        };
        assert!(!missing.matches(&road()));
    }
}
