//! Shared types, constants and errors (compile on every target)

pub mod constants;
pub mod error;
pub mod types;

pub use error::{ProviderError, SessionError, SessionResult};
pub use types::{Badge, Creator, Profile};

/// Validate an EVM address (`0x` + 40 hex chars) and normalize to lower case.
pub fn normalize_address(address: &str) -> SessionResult<String> {
    let trimmed = address.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| SessionError::InvalidAddress(address.to_string()))?;
    let bytes = hex::decode(body).map_err(|_| SessionError::InvalidAddress(address.to_string()))?;
    if bytes.len() != 20 {
        return Err(SessionError::InvalidAddress(address.to_string()));
    }
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Chain id as the `0x`-prefixed hex quantity wallets expect.
pub fn chain_id_hex(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}
