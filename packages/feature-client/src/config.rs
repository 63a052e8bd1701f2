//! Transport configuration.

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Transaction endpoint advertised by the service. `None` means the
    /// service is read-only and commits fail with an
    /// unsupported-endpoint error.
    pub transaction_url: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            transaction_url: None,
            request_timeout_ms: 10000, // 10 seconds default
        }
    }
}

impl TransportConfig {
    /// Configuration for a service advertising the given endpoint.
    pub fn with_endpoint(url: impl Into<String>) -> Self {
        Self {
            transaction_url: Some(url.into()),
            ..Self::default()
        }
    }
}
