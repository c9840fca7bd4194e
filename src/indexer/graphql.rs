//! GraphQL client for the CyberConnect indexer.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::types::{AddressQuery, AddressResponse};
use super::ProfileIndexer;
use crate::core::{SessionError, SessionResult};

/// Primary profile with its essences, plus every profile owned by the wallet.
pub const ADDRESS_QUERY: &str = r#"
query Address($address: AddressEVM!, $chainID: ChainID!) {
  address(address: $address, chainID: $chainID) {
    wallet {
      primaryProfile {
        profileID
        handle
        essences(first: 100) {
          totalCount
          edges {
            node {
              essenceID
              tokenURI
              createdBy {
                profileID
                handle
                metadata
              }
              isCollectedByMe(me: $address)
            }
          }
        }
      }
      profiles {
        edges {
          node {
            profileID
            handle
            avatar
            metadata
            isPrimary
          }
        }
      }
    }
  }
}
"#;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<AddressResponse>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Clone, Debug)]
pub struct GraphQlIndexer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GraphQlIndexer {
    /// Client with a 10 second request timeout.
    pub fn new(endpoint: impl Into<String>) -> SessionResult<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> SessionResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.into(), api_key: None })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute(&self, query: &str, variables: Value, access_token: &str) -> SessionResult<Value> {
        let body = json!({ "query": query, "variables": variables });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if !access_token.is_empty() {
            request = request.header(reqwest::header::AUTHORIZATION, format!("bearer {access_token}"));
        }
        if let Some(key) = &self.api_key {
            request = request.header("X-API-KEY", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SessionError::Indexer(format!("request failed with status: {}", response.status())));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProfileIndexer for GraphQlIndexer {
    async fn fetch_wallet(&self, query: &AddressQuery, access_token: &str) -> SessionResult<AddressResponse> {
        let raw = self.execute(ADDRESS_QUERY, serde_json::to_value(query)?, access_token).await?;
        let envelope: GraphQlEnvelope = serde_json::from_value(raw)?;

        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let joined = errors.into_iter().map(|e| e.message).collect::<Vec<_>>().join("; ");
            return Err(SessionError::Indexer(joined));
        }
        envelope
            .data
            .ok_or_else(|| SessionError::Indexer("response has no data".into()))
    }
}
