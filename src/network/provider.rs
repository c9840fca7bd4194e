//! WalletProvider - the seam to an injected/bridged EIP-1193 wallet

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ProviderError;

/// Network the wallet is currently connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Network {
    pub fn new(chain_id: u64) -> Self { Self { chain_id, name: None } }
}

pub mod methods {
    pub const CHAIN_ID: &str = "eth_chainId";
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
    pub const ADD_CHAIN: &str = "wallet_addEthereumChain";
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn get_network(&self) -> Result<Network, ProviderError>;
    async fn send(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

/// Parse a JSON-RPC hex quantity (`"0x89"`) or a bare number.
pub fn parse_quantity(value: &Value) -> Result<u64, ProviderError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ProviderError::other(format!("chain id out of range: {n}"))),
        Value::String(s) => {
            let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"));
            match digits {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse::<u64>(),
            }
            .map_err(|e| ProviderError::other(format!("bad chain id '{s}': {e}")))
        }
        other => Err(ProviderError::other(format!("unexpected chain id: {other}"))),
    }
}
