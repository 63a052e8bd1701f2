//! Dependency reordering of one feature type's action list.
//!
//! The service assigns permanent identifiers to inserted features only
//! after the commit succeeds, so an update or delete issued against a
//! not-yet-committed insert targets an identifier the service has never
//! seen. Before a request is built, every such dependency must be settled
//! locally: matching updates are folded into the pending insert's record,
//! and a delete that uniquely targets a pending insert cancels it
//! entirely. The wire protocol has no way for a later operation to
//! back-reference an earlier insert's eventual identifier.

use crate::action::Action;

/// Resolves temporary-identifier dependencies in one feature type's
/// action list.
///
/// After this runs, no remaining update or delete selects a record solely
/// by the temporary identifier of an insert still present in the list.
/// Surviving inserts end up after all other actions, in their original
/// relative order. Total over any well-formed list, and idempotent.
pub fn combine_actions(actions: &mut Vec<Action>) {
    // Select-nothing actions can never have a remote effect.
    actions.retain(|action| match action.filter() {
        Some(filter) => !filter.is_select_none(),
        None => true,
    });

    // Bubble each insert toward the end of the list, settling every
    // dependent action it passes. Each insert is processed exactly once:
    // it either reaches the tail or is cancelled along the way.
    let pending_inserts = actions.iter().filter(|a| a.is_insert()).count();
    for _ in 0..pending_inserts {
        let Some(start) = actions.iter().position(Action::is_insert) else {
            break;
        };
        process_insert(actions, start);
    }
}

/// Moves the insert at `start` rightward until it has no successor or is
/// cancelled.
fn process_insert(actions: &mut Vec<Action>, start: usize) {
    enum Outcome {
        /// Successor is unrelated (or an already-settled non-unique
        /// update): exchange positions
        Swap,
        /// A matching delete consumed the insert; when it uniquely
        /// targeted the insert the delete itself is dropped too
        Cancel { remove_delete: bool },
        /// A uniquely-targeting update was folded into the insert's
        /// record and fully absorbed
        Absorb,
    }

    let mut i = start;
    while i + 1 < actions.len() {
        let outcome = {
            let (head, tail) = actions.split_at_mut(i + 1);
            let Action::Insert { feature } = &mut head[i] else {
                return;
            };
            match &tail[0] {
                Action::Delete { filter, .. } if filter.matches(feature) => Outcome::Cancel {
                    remove_delete: filter.single_id().is_some(),
                },
                Action::Update {
                    filter, updates, ..
                } if filter.matches(feature) => {
                    // The identifier does not exist remotely yet, so the
                    // mutation is materialized on the pending record.
                    for (name, value) in updates {
                        feature.set_attribute(name.clone(), value.clone());
                    }
                    if filter.single_id().is_some() {
                        Outcome::Absorb
                    } else {
                        // The update may also apply to already-persisted
                        // records; it stays in the list.
                        Outcome::Swap
                    }
                }
                _ => Outcome::Swap,
            }
        };

        match outcome {
            Outcome::Swap => {
                actions.swap(i, i + 1);
                i += 1;
            }
            Outcome::Absorb => {
                actions.remove(i + 1);
            }
            Outcome::Cancel { remove_delete } => {
                actions.remove(i);
                if remove_delete {
                    actions.remove(i);
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_model::{Feature, Filter, Value};
    use std::collections::BTreeMap;

    fn insert(id: &str) -> Action {
        Action::insert(Feature::new("roads", id).with_attribute("lanes", Value::I64(2)))
    }

    fn update_by_id(id: &str, field: &str, value: Value) -> Action {
        let mut updates = BTreeMap::new();
        updates.insert(field.to_string(), value);
        Action::update("roads", Filter::id(id), updates)
    }

    fn delete_by_id(id: &str) -> Action {
        Action::delete("roads", Filter::id(id))
    }

    fn combined(mut actions: Vec<Action>) -> Vec<Action> {
        combine_actions(&mut actions);
        actions
    }

    #[test]
    fn drops_select_nothing_actions() {
        let actions = combined(vec![
            Action::delete("roads", Filter::SelectNone),
            Action::update("roads", Filter::SelectNone, BTreeMap::new()),
            delete_by_id("roads.1"),
        ]);
        assert_eq!(actions, vec![delete_by_id("roads.1")]);
    }

    #[test]
    fn insert_then_unique_delete_cancel_out() {
        let actions = combined(vec![insert("newroads.9"), delete_by_id("newroads.9")]);
        assert!(actions.is_empty());
    }

    #[test]
    fn insert_update_delete_chain_leaves_no_trace() {
        let actions = combined(vec![
            insert("newroads.9"),
            update_by_id("newroads.9", "lanes", Value::I64(4)),
            delete_by_id("newroads.9"),
        ]);
        assert!(actions.is_empty());
    }

    #[test]
    fn unique_update_folds_into_insert() {
        let actions = combined(vec![
            insert("newroads.9"),
            update_by_id("newroads.9", "lanes", Value::I64(4)),
        ]);

        assert_eq!(actions.len(), 1);
        let Action::Insert { feature } = &actions[0] else {
            panic!("expected a surviving insert, got {:?}", actions[0]);
        };
        assert_eq!(feature.attribute("lanes"), Some(&Value::I64(4)));
    }

    #[test]
    fn broad_update_is_folded_but_retained() {
        // An update that also matches persisted records must still be
        // transmitted, yet its mutation applies to the pending insert.
        let broad = Action::update(
            "roads",
            Filter::Equals {
                field: "lanes".into(),
                value: Value::I64(2),
            },
            {
                let mut updates = BTreeMap::new();
                updates.insert("lanes".to_string(), Value::I64(4));
                updates
            },
        );
        let actions = combined(vec![insert("newroads.9"), broad.clone()]);

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0], broad);
        let Action::Insert { feature } = &actions[1] else {
            panic!("expected the insert to bubble past the update");
        };
        assert_eq!(feature.attribute("lanes"), Some(&Value::I64(4)));
    }

    #[test]
    fn broad_delete_consumes_insert_but_survives() {
        // A delete matching the pending insert and other records removes
        // the insert locally and still goes to the service.
        let broad = Action::delete(
            "roads",
            Filter::Ids {
                ids: vec!["newroads.9".into(), "roads.4".into()],
            },
        );
        let actions = combined(vec![insert("newroads.9"), broad.clone()]);
        assert_eq!(actions, vec![broad]);
    }

    #[test]
    fn unrelated_actions_keep_their_relative_order() {
        let other_update = update_by_id("roads.1", "lanes", Value::I64(6));
        let other_delete = delete_by_id("roads.2");
        let actions = combined(vec![
            insert("newroads.9"),
            other_update.clone(),
            other_delete.clone(),
            insert("newroads.8"),
        ]);

        assert_eq!(
            actions,
            vec![
                other_update,
                other_delete,
                insert("newroads.9"),
                insert("newroads.8"),
            ]
        );
    }

    #[test]
    fn combine_is_idempotent() {
        let mut actions = vec![
            insert("newroads.9"),
            update_by_id("newroads.9", "lanes", Value::I64(4)),
            delete_by_id("roads.2"),
            insert("newroads.8"),
            update_by_id("roads.1", "lanes", Value::I64(6)),
        ];
        combine_actions(&mut actions);
        let once = actions.clone();
        combine_actions(&mut actions);
        assert_eq!(actions, once);
    }

    #[test]
    fn empty_and_insert_free_lists_are_untouched() {
        assert!(combined(Vec::new()).is_empty());

        let only_updates = vec![
            update_by_id("roads.1", "lanes", Value::I64(6)),
            delete_by_id("roads.2"),
        ];
        assert_eq!(combined(only_updates.clone()), only_updates);
    }
}
