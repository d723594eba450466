//! JSON-RPC 2.0 transport over HTTP.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ProviderError, USER_REJECTED_CODE};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP settings for a [`JsonRpcClient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// HTTP client for an Ethereum JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL. Cloning is cheap and
/// clones share the connection pool and the request id counter.
#[derive(Clone, Debug)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

/// Error object of a JSON-RPC response.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl JsonRpcClient {
    /// Create a client targeting the given endpoint (e.g. `http://127.0.0.1:8545`).
    pub fn new(url: impl Into<String>, options: TransportOptions) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| ProviderError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a request and deserialize its `result` field.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, id, url = %self.url, "json-rpc request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    ProviderError::Unreachable(format!("connection failed: {e}"))
                } else {
                    ProviderError::Other(format!("request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Http(response.status().as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON response: {e}")))?;

        parse_response(method, json)
    }
}

/// Extract the typed `result` of a JSON-RPC response, or map its `error`.
pub fn parse_response<T: DeserializeOwned>(
    method: &str,
    mut json: serde_json::Value,
) -> Result<T, ProviderError> {
    if let Some(err) = json.get("error").filter(|e| !e.is_null()) {
        let err: RpcErrorObject = serde_json::from_value(err.clone()).map_err(|e| {
            ProviderError::InvalidResponse(format!("malformed error object for {method}: {e}"))
        })?;
        if err.code == USER_REJECTED_CODE {
            return Err(ProviderError::Rejected(err.message));
        }
        return Err(ProviderError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    let result = json
        .get_mut("result")
        .map(serde_json::Value::take)
        .ok_or_else(|| ProviderError::InvalidResponse(format!("{method}: missing result")))?;

    serde_json::from_value(result)
        .map_err(|e| ProviderError::InvalidResponse(format!("{method}: {e}")))
}
