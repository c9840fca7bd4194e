//! Network - make sure the wallet is on the profile chain
//!
//! ```text
//! get_network() ── chain_id == expected ──────────────▶ Verified
//!      ├─ 4902 ─▶ wallet_addEthereumChain ─────────────▶ Added (reset)
//!      │
//!      └─ otherwise ─▶ wallet_switchEthereumChain ─ok─▶ Switched  (reset)
//!                           │
//!                           └─ 4902 ─▶ wallet_addEthereumChain ─▶ Added (reset)
//!                           └─ other error ─▶ Err
//! ```

pub mod provider;
pub mod rpc;

pub use provider::{Network, WalletProvider};
pub use rpc::JsonRpcProvider;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::{chain_id_hex, SessionResult};
use crate::session::ChainConfig;
use provider::methods;

/// Result of a network check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkCheck {
    Verified,
    Switched,
    Added,
}

impl NetworkCheck {
    /// Switching or adding a chain invalidates everything read so far.
    pub fn requires_reset(&self) -> bool {
        !matches!(self, NetworkCheck::Verified)
    }
}

pub async fn verify_network(provider: &dyn WalletProvider, chain: &ChainConfig) -> SessionResult<NetworkCheck> {
    // Some wallets already answer 4902 when asked for the current network.
    let network = match provider.get_network().await {
        Ok(network) => network,
        Err(e) if e.is_unrecognized_chain() => return add_chain(provider, chain).await,
        Err(e) => return Err(e.into()),
    };
    if network.chain_id == chain.chain_id {
        tracing::debug!(chain_id = network.chain_id, "wallet on expected chain");
        return Ok(NetworkCheck::Verified);
    }

    tracing::warn!(current = network.chain_id, expected = chain.chain_id, "wallet on wrong chain, switching");
    let chain_id = chain_id_hex(chain.chain_id);
    match provider.send(methods::SWITCH_CHAIN, json!([{ "chainId": chain_id }])).await {
        Ok(_) => Ok(NetworkCheck::Switched),
        Err(e) if e.is_unrecognized_chain() => add_chain(provider, chain).await,
        Err(e) => Err(e.into()),
    }
}

async fn add_chain(provider: &dyn WalletProvider, chain: &ChainConfig) -> SessionResult<NetworkCheck> {
    tracing::info!(chain_id = chain.chain_id, rpc = %chain.rpc_url, "chain unknown to wallet, adding");
    provider.send(methods::ADD_CHAIN, add_chain_params(chain)).await?;
    Ok(NetworkCheck::Added)
}

fn add_chain_params(chain: &ChainConfig) -> Value {
    let mut params = json!({
        "chainId": chain_id_hex(chain.chain_id),
        "rpcUrls": [chain.rpc_url],
    });
    if let Some(name) = &chain.chain_name {
        params["chainName"] = json!(name);
    }
    json!([params])
}
