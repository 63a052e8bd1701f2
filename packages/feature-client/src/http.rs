//! HTTP transport for the transaction protocol.

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use crate::config::TransportConfig;
use crate::error::ClientError;
use crate::transport::{TransactionRequest, TransactionResult, TransactionTransport};

/// Posts the transaction document as JSON to the service's advertised
/// transaction endpoint.
///
/// The endpoint comes from service capabilities; a service without one is
/// read-only and every send fails before any I/O happens.
pub struct HttpTransport {
    config: TransportConfig,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { config, client }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl TransactionTransport for HttpTransport {
    async fn send(&self, request: &TransactionRequest) -> Result<TransactionResult, ClientError> {
        let url = self
            .config
            .transaction_url
            .as_deref()
            .ok_or(ClientError::UnsupportedEndpoint)?;

        let body = serde_json::to_vec(request)
            .map_err(|e| ClientError::Serialization(format!("Failed to encode request: {}", e)))?;

        let http_request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(hyper::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| ClientError::Transport(format!("Failed to build request: {}", e)))?;

        tracing::debug!("POST transaction to {}", url);
        let timeout = Duration::from_millis(self.config.request_timeout_ms);
        let response = match tokio::time::timeout(timeout, self.client.request(http_request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(ClientError::Transport(e.to_string())),
            Err(_) => {
                return Err(ClientError::Transport(format!(
                    "Request timed out after {} ms",
                    self.config.request_timeout_ms
                )))
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::Transport(format!(
                "Service returned HTTP {}",
                status
            )));
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .to_bytes();

        serde_json::from_slice(&body)
            .map_err(|e| ClientError::Serialization(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_endpoint_is_unsupported_before_any_io() {
        let transport = HttpTransport::new(TransportConfig::default());
        let request = TransactionRequest {
            handle: None,
            namespaces: Vec::new(),
            groups: Vec::new(),
        };

        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedEndpoint));
    }
}
