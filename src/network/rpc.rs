//! JSON-RPC wallet bridge - EIP-1193 requests over HTTP
//!
//! Talks to any endpoint that accepts `{"jsonrpc":"2.0","method","params","id"}`
//! and answers with `result` or `error: {code, message}`: a desktop wallet
//! bridge, a WalletConnect relay shim, or a dev node.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::provider::{methods, parse_quantity, Network, WalletProvider};
use crate::core::{ProviderError, SessionResult};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

pub struct JsonRpcProvider {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcProvider {
    /// Client with a 30 second request timeout.
    pub fn new(url: impl Into<String>) -> SessionResult<Self> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> SessionResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into(), next_id: AtomicU64::new(1) })
    }

    pub fn url(&self) -> &str { &self.url }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});
        tracing::debug!(method, id, "wallet rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::other(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ProviderError::other(format!("request failed with status: {}", response.status())));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::other(format!("failed to parse JSON: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(ProviderError::new(err.code, err.message));
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl WalletProvider for JsonRpcProvider {
    async fn get_network(&self) -> Result<Network, ProviderError> {
        let result = self.request(methods::CHAIN_ID, json!([])).await?;
        Ok(Network::new(parse_quantity(&result)?))
    }

    async fn send(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.request(method, params).await
    }
}
