//! CLI for applying a batch of feature edits against a remote service.
//!
//! Reads a JSON batch file declaring feature type schemas and a sequence
//! of insert/update/delete edits, buffers them in one client transaction,
//! and commits them in a single request.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use feature_client::{Action, FeatureTransaction, HttpTransport, TransportConfig};
use feature_model::{Feature, FeatureTypeSchema, Filter, StaticSchemaProvider, Value};

/// Command-line arguments for the edit tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transaction endpoint of the feature service
    #[arg(long)]
    endpoint: String,

    /// JSON batch file with schemas and edits to apply
    #[arg(long)]
    batch: PathBuf,

    /// Label attached to the commit for service logs
    #[arg(long)]
    handle: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 10000)]
    request_timeout_ms: u64,
}

/// Batch file contents: schemas plus the edits to buffer and commit.
#[derive(Debug, Deserialize)]
struct EditBatch {
    schemas: Vec<FeatureTypeSchema>,
    edits: Vec<Edit>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Edit {
    Insert {
        type_name: String,
        attributes: BTreeMap<String, Value>,
    },
    Update {
        type_name: String,
        filter: Filter,
        updates: BTreeMap<String, Value>,
    },
    Delete {
        type_name: String,
        filter: Filter,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    let raw = std::fs::read_to_string(&args.batch)
        .with_context(|| format!("Failed to read batch file {}", args.batch.display()))?;
    let batch: EditBatch = serde_json::from_str(&raw).context("Failed to parse batch file")?;

    let mut schemas = StaticSchemaProvider::new();
    for schema in batch.schemas {
        schemas.insert(schema);
    }

    let transport = Arc::new(HttpTransport::new(TransportConfig {
        transaction_url: Some(args.endpoint),
        request_timeout_ms: args.request_timeout_ms,
    }));
    let mut txn = FeatureTransaction::new(transport, Arc::new(schemas));
    if let Some(handle) = args.handle {
        txn = txn.with_handle(handle);
    }

    let mut temp_ids = Vec::new();
    for edit in batch.edits {
        match edit {
            Edit::Insert {
                type_name,
                attributes,
            } => {
                let temp_id = txn.next_temporary_id(&type_name);
                let mut feature = Feature::new(&type_name, &temp_id);
                for (name, value) in attributes {
                    feature.set_attribute(name, value);
                }
                txn.add_action(Action::insert(feature));
                temp_ids.push(temp_id);
            }
            Edit::Update {
                type_name,
                filter,
                updates,
            } => {
                txn.add_action(Action::update(type_name, filter, updates));
            }
            Edit::Delete { type_name, filter } => {
                txn.add_action(Action::delete(type_name, filter));
            }
        }
    }

    let pending = txn.all_actions().len();
    tracing::info!("Committing {} buffered edits", pending);
    let result = txn.commit().await?;

    println!(
        "Committed {} edits ({} features inserted)",
        pending,
        result.inserted_ids.len()
    );
    let fids = txn.fid_map();
    for temp_id in temp_ids {
        match fids.resolve(&temp_id) {
            Some(permanent) => println!("{} -> {}", temp_id, permanent),
            None => println!("{} -> (unmapped)", temp_id),
        }
    }

    Ok(())
}
