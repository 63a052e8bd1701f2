//! Client error types.

use feature_model::SchemaError;
use thiserror::Error;

/// Errors surfaced by the transaction client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service advertises no write endpoint
    #[error("Service does not advertise a transaction endpoint")]
    UnsupportedEndpoint,

    /// I/O failure while talking to the service
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request or response could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The service processed the transaction and reported failure
    #[error("Commit failed: {message}")]
    CommitFailed { message: String },

    /// Feature type not known to the schema provider
    #[error("Unknown feature type '{0}'")]
    UnknownFeatureType(String),
}

impl From<SchemaError> for ClientError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::UnknownFeatureType(name) => ClientError::UnknownFeatureType(name),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
