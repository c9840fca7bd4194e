//! Indexer wire types for the `address → wallet` query

use serde::{Deserialize, Serialize};

use crate::core::{Badge, Profile};

/// Variables for the address query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub address: String,
    #[serde(rename = "chainID")]
    pub chain_id: u64,
}

/// `data` payload of the address query. Every level may be null on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressResponse {
    #[serde(default)]
    pub address: Option<AddressNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressNode {
    #[serde(default)]
    pub wallet: Option<WalletNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletNode {
    #[serde(rename = "primaryProfile", default)]
    pub primary_profile: Option<PrimaryProfileNode>,
    #[serde(default)]
    pub profiles: Option<Connection<Profile>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryProfileNode {
    #[serde(rename = "profileID", default)]
    pub profile_id: Option<u64>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub essences: Option<EssenceConnection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EssenceConnection {
    #[serde(rename = "totalCount", default)]
    pub total_count: usize,
    #[serde(default)]
    pub edges: Vec<Edge<Badge>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    #[serde(default = "Option::default")]
    pub node: Option<T>,
}

/// Flattened view of one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletSnapshot {
    pub primary_profile_id: Option<u64>,
    pub primary_handle: Option<String>,
    pub badges: Vec<Badge>,
    /// `essences.totalCount`, which may exceed the page of edges returned.
    pub badge_total: usize,
    pub profiles: Vec<Profile>,
    /// Edge at index `totalCount - 1`, if present in the page.
    pub newest_badge: Option<Badge>,
}

impl WalletSnapshot {
    pub fn badge_count(&self) -> usize { self.badge_total }

    pub fn profile_count(&self) -> usize { self.profiles.len() }

    pub fn newest_profile(&self) -> Option<&Profile> { self.profiles.last() }
}

impl AddressResponse {
    pub fn snapshot(&self) -> WalletSnapshot {
        let wallet = self.address.as_ref().and_then(|a| a.wallet.as_ref());
        let primary = wallet.and_then(|w| w.primary_profile.as_ref());
        let essences = primary.and_then(|p| p.essences.as_ref());

        let badge_total = essences.map(|e| e.total_count).unwrap_or(0);
        let newest_badge = essences
            .zip(badge_total.checked_sub(1))
            .and_then(|(e, idx)| e.edges.get(idx))
            .and_then(|edge| edge.node.clone());

        WalletSnapshot {
            primary_profile_id: primary.and_then(|p| p.profile_id),
            primary_handle: primary.and_then(|p| p.handle.clone()),
            badges: essences
                .map(|e| e.edges.iter().filter_map(|edge| edge.node.clone()).collect())
                .unwrap_or_default(),
            badge_total,
            profiles: wallet
                .and_then(|w| w.profiles.as_ref())
                .map(|c| c.edges.iter().filter_map(|edge| edge.node.clone()).collect())
                .unwrap_or_default(),
            newest_badge,
        }
    }
}
