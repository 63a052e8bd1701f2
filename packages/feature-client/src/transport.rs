//! Transport seam: outbound request and parsed result types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ClientError;

/// Outcome status reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Success,
    Failed,
}

/// Parsed response to one transaction request. Returned once per commit,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResult {
    pub status: TransactionStatus,
    /// Server-reported cause when the status is `Failed`
    #[serde(default)]
    pub error: Option<String>,
    /// Permanent identifiers of inserted features, in request order
    #[serde(default)]
    pub inserted_ids: Vec<String>,
}

impl TransactionResult {
    pub fn success(inserted_ids: Vec<String>) -> Self {
        Self {
            status: TransactionStatus::Success,
            error: None,
            inserted_ids,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TransactionStatus::Failed,
            error: Some(message.into()),
            inserted_ids: Vec::new(),
        }
    }
}

/// Actions of one feature type, in transmission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionGroup {
    pub type_name: String,
    pub actions: Vec<Action>,
}

/// One outbound transaction document spanning all pending feature types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Optional human-readable label echoed into service logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Namespaces of every referenced feature type's schema
    pub namespaces: Vec<String>,
    /// Per-type action groups; order within each group is significant
    pub groups: Vec<ActionGroup>,
}

/// Serializes and transmits one transaction request.
///
/// Implementations must preserve per-type action order and surface
/// transport failures without mutating any client state.
#[async_trait]
pub trait TransactionTransport: Send + Sync {
    async fn send(&self, request: &TransactionRequest) -> Result<TransactionResult, ClientError>;
}
