//! Pending-action buffer and temporary identifier allocation.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::action::Action;
use crate::reorder::combine_actions;

/// Returns whether an identifier is a client-assigned temporary one.
///
/// Temporary identifiers have the textual form `"new" + type_name + "." + n`
/// with `n` a decimal integer. The format is part of the contract:
/// downstream components recognize still-temporary identifiers by this
/// pattern.
pub fn is_temporary_id(id: &str) -> bool {
    match id.strip_prefix("new").and_then(|rest| rest.rsplit_once('.')) {
        Some((type_name, n)) => !type_name.is_empty() && n.parse::<i64>().is_ok(),
        None => false,
    }
}

/// Per-feature-type buffer of pending actions.
///
/// Insertion order is significant: it is the order operations were issued
/// in and the order they are transmitted in, after reordering. All
/// mutation happens under one mutex; temporary identifier allocation uses
/// an atomic counter so it never blocks on the action map.
#[derive(Debug)]
pub struct TransactionBuffer {
    actions: Mutex<HashMap<String, Vec<Action>>>,
    next_fid: AtomicI64,
}

impl Default for TransactionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuffer {
    pub fn new() -> Self {
        Self {
            actions: Mutex::new(HashMap::new()),
            next_fid: AtomicI64::new(i64::MAX),
        }
    }

    /// Appends an action to its feature type's list.
    ///
    /// Always succeeds; filter satisfiability is not validated here.
    pub fn add_action(&self, action: Action) {
        let mut map = self.actions.lock();
        map.entry(action.type_name().to_string())
            .or_default()
            .push(action);
    }

    /// Returns a copy of the pending actions for one feature type.
    pub fn actions(&self, type_name: &str) -> Vec<Action> {
        let map = self.actions.lock();
        map.get(type_name).cloned().unwrap_or_default()
    }

    /// Returns a copy of the pending actions for all feature types.
    pub fn all_actions(&self) -> Vec<Action> {
        let map = self.actions.lock();
        map.values().flat_map(|actions| actions.iter().cloned()).collect()
    }

    /// Returns whether any action is pending.
    pub fn is_empty(&self) -> bool {
        let map = self.actions.lock();
        map.values().all(|actions| actions.is_empty())
    }

    /// Allocates a new temporary identifier for the given feature type.
    ///
    /// Identifiers are strictly decreasing from a large sentinel; no two
    /// calls return the same value, even concurrently.
    pub fn next_temporary_id(&self, type_name: &str) -> String {
        let fid = self.next_fid.fetch_sub(1, Ordering::Relaxed);
        format!("new{}.{}", type_name, fid)
    }

    /// Discards every pending action for every feature type.
    ///
    /// Idempotent; has no remote effect. A snapshot already taken by an
    /// in-flight commit is a separate copy and is not affected.
    pub fn rollback(&self) {
        let mut map = self.actions.lock();
        map.clear();
    }

    /// Reorders every feature type's list and returns a deep copy of the
    /// result. Runs entirely under the buffer mutex; the caller performs
    /// network I/O on the returned snapshot only.
    pub(crate) fn reorder_and_snapshot(&self) -> HashMap<String, Vec<Action>> {
        let mut map = self.actions.lock();
        for actions in map.values_mut() {
            combine_actions(actions);
        }
        map.clone()
    }

    /// Removes the given submitted actions from the live buffer, first
    /// equal occurrence each. Actions appended concurrently during the
    /// commit round trip are retained for the next commit.
    pub(crate) fn remove_submitted(&self, type_name: &str, submitted: &[Action]) {
        let mut map = self.actions.lock();
        if let Some(actions) = map.get_mut(type_name) {
            for action in submitted {
                if let Some(pos) = actions.iter().position(|a| a == action) {
                    actions.remove(pos);
                }
            }
            if actions.is_empty() {
                map.remove(type_name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_model::{Feature, Filter};
    use ntest::timeout;
    use std::sync::Arc;

    fn insert(type_name: &str, id: &str) -> Action {
        Action::insert(Feature::new(type_name, id))
    }

    #[test]
    fn actions_returns_defensive_copy() {
        let buffer = TransactionBuffer::new();
        buffer.add_action(insert("roads", "newroads.1"));

        let mut copy = buffer.actions("roads");
        copy.clear();
        assert_eq!(buffer.actions("roads").len(), 1);
    }

    #[test]
    fn actions_empty_for_unknown_type() {
        let buffer = TransactionBuffer::new();
        assert!(buffer.actions("rivers").is_empty());
    }

    #[test]
    fn all_actions_spans_feature_types() {
        let buffer = TransactionBuffer::new();
        buffer.add_action(insert("roads", "newroads.1"));
        buffer.add_action(insert("rivers", "newrivers.2"));
        buffer.add_action(Action::delete("roads", Filter::id("roads.3")));

        assert_eq!(buffer.all_actions().len(), 3);
    }

    #[test]
    fn temporary_ids_are_decreasing_and_well_formed() {
        let buffer = TransactionBuffer::new();
        let first = buffer.next_temporary_id("roads");
        let second = buffer.next_temporary_id("roads");

        assert_eq!(first, format!("newroads.{}", i64::MAX));
        assert_eq!(second, format!("newroads.{}", i64::MAX - 1));
        assert!(is_temporary_id(&first));
        assert!(is_temporary_id(&second));
    }

    #[test]
    fn recognizes_temporary_id_pattern() {
        assert!(is_temporary_id("newroads.9223372036854775807"));
        assert!(is_temporary_id("newroads.42"));
        assert!(!is_temporary_id("roads.42"));
        assert!(!is_temporary_id("new.42"));
        assert!(!is_temporary_id("newroads"));
        assert!(!is_temporary_id("newroads.notanumber"));
    }

    #[test]
    #[timeout(10000)]
    fn concurrent_allocation_yields_distinct_ids() {
        let buffer = Arc::new(TransactionBuffer::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let buffer = Arc::clone(&buffer);
            handles.push(std::thread::spawn(move || {
                (0..100)
                    .map(|_| buffer.next_temporary_id("roads"))
                    .collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<String> = Vec::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }
        let distinct: std::collections::HashSet<&String> = all.iter().collect();
        assert_eq!(distinct.len(), 800);
    }

    #[test]
    fn rollback_discards_everything_and_is_idempotent() {
        let buffer = TransactionBuffer::new();
        buffer.add_action(insert("roads", "newroads.1"));
        buffer.add_action(insert("rivers", "newrivers.2"));

        buffer.rollback();
        assert!(buffer.actions("roads").is_empty());
        assert!(buffer.actions("rivers").is_empty());
        assert!(buffer.is_empty());

        buffer.rollback();
        assert!(buffer.is_empty());
    }

    #[test]
    fn remove_submitted_keeps_later_additions() {
        let buffer = TransactionBuffer::new();
        let committed = insert("roads", "newroads.1");
        buffer.add_action(committed.clone());

        let snapshot = buffer.actions("roads");
        buffer.add_action(insert("roads", "newroads.2"));

        buffer.remove_submitted("roads", &snapshot);
        let remaining = buffer.actions("roads");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0], insert("roads", "newroads.2"));
    }
}
