//! Client-side transaction buffering and atomic commit for remote
//! feature services.
//!
//! Buffers Insert/Update/Delete actions per feature type, resolves
//! temporary-identifier dependencies locally before anything goes on the
//! wire, commits all pending actions in one request, and maps the
//! service-assigned permanent identifiers back onto the client's
//! temporary ones.

pub mod action;
pub mod buffer;
pub mod config;
pub mod error;
pub mod fid_map;
pub mod http;
pub mod reorder;
pub mod transaction;
pub mod transport;

pub use action::Action;
pub use buffer::{is_temporary_id, TransactionBuffer};
pub use config::TransportConfig;
pub use error::{ClientError, Result};
pub use fid_map::{FidMap, FidStore};
pub use http::HttpTransport;
pub use reorder::combine_actions;
pub use transaction::FeatureTransaction;
pub use transport::{
    ActionGroup, TransactionRequest, TransactionResult, TransactionStatus, TransactionTransport,
};
