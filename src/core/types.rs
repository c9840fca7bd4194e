//! Profile and badge records as surfaced by the indexer

use serde::{Deserialize, Serialize};

/// A Link3 profile owned by the connected wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "profileID")]
    pub profile_id: u64,
    #[serde(default)]
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

impl Profile {
    pub fn new(profile_id: u64, handle: impl Into<String>) -> Self {
        Self { profile_id, handle: handle.into(), avatar: None, metadata: None, is_primary: false }
    }
}

/// Profile that minted an essence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Creator {
    #[serde(rename = "profileID", default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

/// An essence attached to a profile. The UI calls these badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(rename = "essenceID")]
    pub essence_id: u64,
    #[serde(rename = "tokenURI", default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Creator>,
    #[serde(default)]
    pub is_collected_by_me: bool,
}

impl Badge {
    pub fn new(essence_id: u64, token_uri: impl Into<String>) -> Self {
        Self { essence_id, token_uri: Some(token_uri.into()), created_by: None, is_collected_by_me: false }
    }

    pub fn with_creator(mut self, profile_id: u64, metadata: impl Into<String>) -> Self {
        self.created_by = Some(Creator { profile_id: Some(profile_id), handle: None, metadata: Some(metadata.into()) });
        self
    }
}
