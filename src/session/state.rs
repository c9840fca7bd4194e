//! SessionState - everything known about the connected wallet

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{Badge, Profile};
use crate::indexer::WalletSnapshot;
use crate::network::{NetworkCheck, WalletProvider};

/// Mutable session state. Owned by `SessionController`; the poller writes
/// through it only while its generation is current.
#[derive(Default)]
pub struct SessionState {
    pub provider: Option<Arc<dyn WalletProvider>>,
    pub address: Option<String>,
    pub access_token: Option<String>,
    pub primary_profile_id: Option<u64>,
    pub primary_handle: Option<String>,
    pub profile_count: usize,
    pub badge_count: usize,
    pub badges: Vec<Badge>,
    pub profiles: Vec<Profile>,
    pub is_creating_profile: bool,
    pub is_creating_badge: bool,
    pub network: Option<NetworkCheck>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub(crate) generation: u64,
}

impl SessionState {
    pub fn is_creating(&self) -> bool {
        self.is_creating_profile || self.is_creating_badge
    }

    pub fn clear_creation_flags(&mut self) {
        self.is_creating_profile = false;
        self.is_creating_badge = false;
    }

    /// Overwrite everything derived from the indexer with `snapshot`.
    pub fn replace_with(&mut self, snapshot: WalletSnapshot) {
        self.profile_count = snapshot.profile_count();
        self.badge_count = snapshot.badge_count();
        self.primary_profile_id = snapshot.primary_profile_id;
        self.primary_handle = snapshot.primary_handle;
        self.badges = snapshot.badges;
        self.profiles = snapshot.profiles;
    }

    /// Drop indexer data and flags, keep the connection (provider, address, token).
    pub fn clear_derived(&mut self) {
        self.primary_profile_id = None;
        self.primary_handle = None;
        self.profile_count = 0;
        self.badge_count = 0;
        self.badges.clear();
        self.profiles.clear();
        self.clear_creation_flags();
        self.last_synced_at = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            connected: self.provider.is_some(),
            address: self.address.clone(),
            has_access_token: self.access_token.is_some(),
            primary_profile_id: self.primary_profile_id,
            primary_handle: self.primary_handle.clone(),
            profile_count: self.profile_count,
            badge_count: self.badge_count,
            badges: self.badges.clone(),
            profiles: self.profiles.clone(),
            is_creating_profile: self.is_creating_profile,
            is_creating_badge: self.is_creating_badge,
            network: self.network,
            last_synced_at: self.last_synced_at,
        }
    }
}

/// Read-only copy of the session handed to subscribers. The token itself is
/// never copied out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub connected: bool,
    pub address: Option<String>,
    pub has_access_token: bool,
    pub primary_profile_id: Option<u64>,
    pub primary_handle: Option<String>,
    pub profile_count: usize,
    pub badge_count: usize,
    pub badges: Vec<Badge>,
    pub profiles: Vec<Profile>,
    pub is_creating_profile: bool,
    pub is_creating_badge: bool,
    pub network: Option<NetworkCheck>,
    pub last_synced_at: Option<DateTime<Utc>>,
}
