//! Errors for wallet, indexer, and session operations

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by a wallet provider (EIP-1193 style `{code, message}`).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("wallet provider error{}: {message}", code.map(|c| format!(" {c}")).unwrap_or_default())]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    /// The requested chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code: Some(code), message: message.into() }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self { code: None, message: message.into() }
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Some(Self::UNRECOGNIZED_CHAIN)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("indexer: {0}")]
    Indexer(String),

    #[cfg(feature = "native")]
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("no wallet provider connected")]
    NoProvider,

    #[error("query cancelled")]
    Cancelled,

    #[error("session lock poisoned")]
    Lock,
}

pub type SessionResult<T> = Result<T, SessionError>;
