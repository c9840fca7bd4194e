//! Session configuration - passed from the host application

use std::env;
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{CHAIN_ID, INDEXER_URL, RPC_URL};
use crate::core::{SessionError, SessionResult};

/// Chain the wallet must be connected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Offered to the wallet via `wallet_addEthereumChain` when it does not know the chain.
    pub rpc_url: String,
    pub chain_name: Option<String>,
}

impl Default for ChainConfig {
    fn default() -> Self { Self { chain_id: CHAIN_ID, rpc_url: RPC_URL.into(), chain_name: None } }
}

impl ChainConfig {
    pub fn new(chain_id: u64, rpc_url: impl Into<String>) -> Self {
        Self { chain_id, rpc_url: rpc_url.into(), chain_name: None }
    }
    pub fn with_name(mut self, name: impl Into<String>) -> Self { self.chain_name = Some(name.into()); self }
}

/// Retry budget while waiting for the indexer to catch up with a creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self { Self { max_attempts: 150, interval: Duration::from_secs(2) } }
}

impl PollConfig {
    pub fn new(max_attempts: u32, interval: Duration) -> Self { Self { max_attempts, interval } }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub indexer_url: String,
    pub api_key: Option<String>,
    pub chain: ChainConfig,
    pub poll: PollConfig,
    /// Buffer of the event channel; slow subscribers past this lag.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            indexer_url: INDEXER_URL.into(),
            api_key: None,
            chain: ChainConfig::default(),
            poll: PollConfig::default(),
            event_capacity: 64,
        }
    }
}

impl SessionConfig {
    pub fn new(indexer_url: impl Into<String>) -> Self {
        Self { indexer_url: indexer_url.into(), ..Default::default() }
    }
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self { self.api_key = Some(key.into()); self }
    pub fn with_chain(mut self, chain: ChainConfig) -> Self { self.chain = chain; self }
    pub fn with_poll(mut self, poll: PollConfig) -> Self { self.poll = poll; self }
    pub fn with_event_capacity(mut self, capacity: usize) -> Self { self.event_capacity = capacity.max(1); self }

    /// Build from `LINK3_*` variables, loading `.env` first if present.
    /// Variables already set in the process win over the file.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `LINK3_INDEXER_URL` | CyberConnect API |
    /// | `LINK3_API_KEY` | none |
    /// | `LINK3_CHAIN_ID` | 137 |
    /// | `LINK3_RPC_URL` | Infura |
    /// | `LINK3_CHAIN_NAME` | none |
    /// | `LINK3_POLL_INTERVAL_MS` | 2000 |
    /// | `LINK3_POLL_MAX_ATTEMPTS` | 150 |
    pub fn from_env() -> SessionResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(SessionError::InvalidConfig(format!(".env: {e}")));
            }
        }
        Self::from_vars()
    }

    /// Like [`from_env`](Self::from_env) with an explicit env file, which must exist.
    pub fn from_env_file(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        dotenvy::from_path(path)
            .map_err(|e| SessionError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_vars()
    }

    fn from_vars() -> SessionResult<Self> {
        let mut config = SessionConfig::default();
        if let Some(url) = var("LINK3_INDEXER_URL") {
            config.indexer_url = url;
        }
        config.api_key = var("LINK3_API_KEY");
        if let Some(id) = var("LINK3_CHAIN_ID") {
            config.chain.chain_id = parse_number("LINK3_CHAIN_ID", &id)?;
        }
        if let Some(rpc) = var("LINK3_RPC_URL") {
            config.chain.rpc_url = rpc;
        }
        config.chain.chain_name = var("LINK3_CHAIN_NAME");
        if let Some(ms) = var("LINK3_POLL_INTERVAL_MS") {
            config.poll.interval = Duration::from_millis(parse_number("LINK3_POLL_INTERVAL_MS", &ms)?);
        }
        if let Some(n) = var("LINK3_POLL_MAX_ATTEMPTS") {
            config.poll.max_attempts = parse_number("LINK3_POLL_MAX_ATTEMPTS", &n)?;
        }
        Ok(config)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> SessionResult<T> {
    value
        .parse()
        .map_err(|_| SessionError::InvalidConfig(format!("{key}: not a number: {value}")))
}
