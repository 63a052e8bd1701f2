//! Client-side transaction: pending actions and the commit protocol.

use std::sync::Arc;

use feature_model::SchemaProvider;

use crate::action::Action;
use crate::buffer::TransactionBuffer;
use crate::error::{ClientError, Result};
use crate::fid_map::{FidMap, FidStore};
use crate::transport::{
    ActionGroup, TransactionRequest, TransactionResult, TransactionStatus, TransactionTransport,
};

/// Holds the actions pending in one client transaction and commits them
/// in a single request.
///
/// Multiple caller threads may add actions, read buffer state, or trigger
/// a commit concurrently. The commit reorders and snapshots the buffer
/// under its mutex, then performs all network I/O on the snapshot with no
/// lock held, so actions added during the round trip are simply deferred
/// to the next commit.
pub struct FeatureTransaction {
    buffer: TransactionBuffer,
    fids: Arc<FidMap>,
    transport: Arc<dyn TransactionTransport>,
    schemas: Arc<dyn SchemaProvider>,
    handle: Option<String>,
}

impl FeatureTransaction {
    pub fn new(transport: Arc<dyn TransactionTransport>, schemas: Arc<dyn SchemaProvider>) -> Self {
        Self {
            buffer: TransactionBuffer::new(),
            fids: Arc::new(FidMap::new()),
            transport,
            schemas,
            handle: None,
        }
    }

    /// Attaches a human-readable label carried on every commit request.
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Shares an identifier table with the owning store instead of the
    /// transaction's own private one.
    pub fn with_fid_map(mut self, fids: Arc<FidMap>) -> Self {
        self.fids = fids;
        self
    }

    /// Appends an action to the buffer.
    pub fn add_action(&self, action: Action) {
        self.buffer.add_action(action);
    }

    /// Returns a copy of the pending actions for one feature type.
    pub fn actions(&self, type_name: &str) -> Vec<Action> {
        self.buffer.actions(type_name)
    }

    /// Returns a copy of the pending actions for all feature types.
    pub fn all_actions(&self) -> Vec<Action> {
        self.buffer.all_actions()
    }

    /// Allocates a temporary identifier for a feature about to be
    /// inserted under this transaction.
    pub fn next_temporary_id(&self, type_name: &str) -> String {
        self.buffer.next_temporary_id(type_name)
    }

    /// Discards all pending actions. No remote effect; a snapshot already
    /// taken by an in-flight commit is unaffected.
    pub fn rollback(&self) {
        self.buffer.rollback();
    }

    /// Discards pending actions and the per-type results of the last
    /// commit, preparing the object for reuse. Resolved identifier
    /// mappings survive for the owning store.
    pub fn reset(&self) {
        self.buffer.rollback();
        self.fids.clear_latest();
    }

    /// Returns the identifier table updated by successful commits.
    pub fn fid_map(&self) -> Arc<FidMap> {
        Arc::clone(&self.fids)
    }

    /// Returns the permanent identifiers the most recent commit assigned
    /// to inserts of this feature type.
    pub fn latest_fids(&self, type_name: &str) -> Vec<String> {
        self.fids.latest_fids(type_name)
    }

    /// Commits every pending action in one request.
    ///
    /// Reorders each feature type's list, snapshots the buffer, builds a
    /// single request spanning all non-empty types (grouped by type, in
    /// type-name order for determinism), sends it, and reconciles the
    /// returned permanent identifiers against the snapshot's inserts. On
    /// any failure the buffer is left untouched and the same commit may
    /// be retried.
    pub async fn commit(&self) -> Result<TransactionResult> {
        let snapshot = self.buffer.reorder_and_snapshot();

        let mut type_names: Vec<&String> = snapshot
            .iter()
            .filter(|(_, actions)| !actions.is_empty())
            .map(|(type_name, _)| type_name)
            .collect();
        type_names.sort();

        if type_names.is_empty() {
            return Ok(TransactionResult::success(Vec::new()));
        }

        let mut namespaces: Vec<String> = Vec::new();
        let mut groups: Vec<ActionGroup> = Vec::with_capacity(type_names.len());
        for type_name in type_names {
            let schema = self.schemas.schema(type_name)?;
            if !namespaces.contains(&schema.namespace_uri) {
                namespaces.push(schema.namespace_uri);
            }
            groups.push(ActionGroup {
                type_name: type_name.clone(),
                actions: snapshot[type_name].clone(),
            });
        }

        let request = TransactionRequest {
            handle: self.handle.clone(),
            namespaces,
            groups,
        };
        tracing::debug!(
            "Committing {} actions across {} feature types",
            request.groups.iter().map(|g| g.actions.len()).sum::<usize>(),
            request.groups.len()
        );

        let result = self.transport.send(&request).await?;

        if result.status == TransactionStatus::Failed {
            let message = result
                .error
                .clone()
                .unwrap_or_else(|| "Transaction failed without a reported cause".to_string());
            return Err(ClientError::CommitFailed { message });
        }

        self.reconcile_inserted_ids(&request.groups, &result);

        for group in &request.groups {
            self.buffer.remove_submitted(&group.type_name, &group.actions);
        }

        Ok(result)
    }

    /// Walks the committed actions in post-reorder order and consumes one
    /// returned identifier per insert. A short identifier list stops the
    /// mapping early; a count mismatch in either direction is reported
    /// but never fatal, and already-applied mappings stand.
    fn reconcile_inserted_ids(&self, groups: &[ActionGroup], result: &TransactionResult) {
        let mut consumed = 0;
        'groups: for group in groups {
            let mut type_fids = Vec::new();
            for action in &group.actions {
                if let Action::Insert { feature } = action {
                    let Some(permanent) = result.inserted_ids.get(consumed) else {
                        tracing::error!(
                            "Expected more inserted ids in the transaction response; \
                             leaving remaining inserts of '{}' unmapped",
                            group.type_name
                        );
                        self.fids.set_latest_fids(&group.type_name, type_fids);
                        break 'groups;
                    };
                    self.fids.record_mapping(feature.id(), permanent);
                    type_fids.push(permanent.clone());
                    consumed += 1;
                }
            }
            self.fids.set_latest_fids(&group.type_name, type_fids);
        }

        if consumed != result.inserted_ids.len() {
            tracing::error!(
                "Number of inserts submitted does not match inserted ids returned: got {}, expected {}",
                result.inserted_ids.len(),
                consumed
            );
        }
    }
}
