//! Permanent identifier bookkeeping.

use parking_lot::Mutex;
use std::collections::HashMap;

use feature_model::Filter;

/// Records temporary-to-permanent identifier mappings.
///
/// The seam between the commit driver and the owning store: the driver
/// calls [`record_mapping`](FidStore::record_mapping) once per
/// successfully inserted feature.
pub trait FidStore: Send + Sync {
    fn record_mapping(&self, temp_id: &str, permanent_id: &str);
}

/// Identifier table maintained across commits.
///
/// Holds, per feature type, the permanent identifiers assigned by the
/// most recent commit, and a translation table from every temporary
/// identifier ever resolved to its permanent identifier. The owning
/// store consults the table to rewrite identifier filters issued after
/// commit.
#[derive(Debug, Default)]
pub struct FidMap {
    inner: Mutex<FidMapInner>,
}

#[derive(Debug, Default)]
struct FidMapInner {
    /// type name -> permanent ids from the last commit
    latest: HashMap<String, Vec<String>>,
    /// temporary id -> permanent id
    resolved: HashMap<String, String>,
}

impl FidMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the permanent identifiers assigned to this feature type by
    /// the most recent commit. Empty if the type has not been committed.
    pub fn latest_fids(&self, type_name: &str) -> Vec<String> {
        let inner = self.inner.lock();
        inner.latest.get(type_name).cloned().unwrap_or_default()
    }

    /// Returns the permanent identifier a temporary one resolved to.
    pub fn resolve(&self, id: &str) -> Option<String> {
        let inner = self.inner.lock();
        inner.resolved.get(id).cloned()
    }

    /// Rewrites identifier filters, replacing every resolved temporary
    /// identifier with its permanent one. Identifiers without a recorded
    /// mapping (permanent ones, or temporaries from an uncommitted
    /// insert) pass through unchanged.
    pub fn rewrite_filter(&self, filter: &Filter) -> Filter {
        match filter {
            Filter::Ids { ids } => {
                let inner = self.inner.lock();
                Filter::Ids {
                    ids: ids
                        .iter()
                        .map(|id| inner.resolved.get(id).cloned().unwrap_or_else(|| id.clone()))
                        .collect(),
                }
            }
            other => other.clone(),
        }
    }

    pub(crate) fn set_latest_fids(&self, type_name: &str, fids: Vec<String>) {
        let mut inner = self.inner.lock();
        inner.latest.insert(type_name.to_string(), fids);
    }

    /// Forgets the per-type results of the last commit. The translation
    /// table survives: filters referencing old temporary identifiers must
    /// keep resolving for the lifetime of the owning store.
    pub(crate) fn clear_latest(&self) {
        let mut inner = self.inner.lock();
        inner.latest.clear();
    }
}

impl FidStore for FidMap {
    fn record_mapping(&self, temp_id: &str, permanent_id: &str) {
        let mut inner = self.inner.lock();
        inner
            .resolved
            .insert(temp_id.to_string(), permanent_id.to_string());
    }
}
