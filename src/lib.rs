//! link3-session: wallet session state for Link3 profiles and badges.
//!
//! # Architecture
//!
//! ```text
//! SessionController (entry point)
//!   │
//!   ├── SessionState (provider, address, token, indexed profiles/badges, flags)
//!   │
//!   ├── network
//!   │     ├── WalletProvider (trait) ─ JsonRpcProvider
//!   │     └── verify_network → Verified | Switched | Added
//!   │
//!   ├── poller
//!   │     └── run_poll: fetch, reconcile, retry until indexed or exhausted
//!   │
//!   └── indexer
//!         ├── ProfileIndexer (trait) ─ GraphQlIndexer
//!         └── QueryHandle (cancellable in-flight fetch)
//! ```
//!
//! # Operations
//!
//! | Operation | Method | Description |
//! |-----------|--------|-------------|
//! | connect | `set_provider`, `set_address` | Attach wallet; checks the chain |
//! | authorize | `set_access_token` | Starts fetching profile data |
//! | mint | `begin_profile_creation`, `begin_badge_creation` | Poll until the new item is indexed |
//! | reset | `reset()` | Clear indexed data and fetch again |
//! | observe | `subscribe()` | Broadcast of `SessionEvent` |
//! | close | `shutdown()` | Cancel the running poll |
//!
//! # Features
//!
//! - `native` (default) - tokio runtime, reqwest transport, tracing
//!
//! # Usage
//!
//! ```ignore
//! use link3_session::{SessionConfig, SessionController, JsonRpcProvider};
//! use std::sync::Arc;
//!
//! link3_session::logging::init_logging();
//! let session = SessionController::from_config(SessionConfig::from_env()?)?;
//! session.set_provider(Some(Arc::new(JsonRpcProvider::new("http://localhost:8545")?)))?;
//! session.set_address(Some("0x…"))?;
//! session.set_access_token(Some(&token))?;
//!
//! session.begin_badge_creation()?;
//! let outcome = session.wait_idle().await;
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod core;

// =============================================================================
// Native-only modules (tokio, reqwest)
// =============================================================================
#[cfg(feature = "native")]
pub mod indexer;
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod network;
#[cfg(feature = "native")]
pub mod poller;
#[cfg(feature = "native")]
pub mod runtime;
#[cfg(feature = "native")]
pub mod session;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use crate::core::{chain_id_hex, normalize_address, Badge, Creator, Profile, ProviderError, SessionError, SessionResult};

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use indexer::{AddressQuery, AddressResponse, GraphQlIndexer, ProfileIndexer, QueryHandle, WalletSnapshot};
#[cfg(feature = "native")]
pub use network::{verify_network, JsonRpcProvider, Network, NetworkCheck, WalletProvider};
#[cfg(feature = "native")]
pub use poller::{reconcile, PollOutcome, Reconciliation};
#[cfg(feature = "native")]
pub use runtime::CancelToken;
#[cfg(feature = "native")]
pub use session::{
    ChainConfig, PollConfig, SessionConfig, SessionController, SessionEvent, SessionSnapshot, SessionState,
};
