//! In-memory wallet provider and indexer for session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use link3_session::network::provider::methods;
use link3_session::{
    AddressQuery, AddressResponse, Network, ProfileIndexer, ProviderError, SessionError, SessionResult,
    WalletProvider,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const ADDRESS: &str = "0x00000000000000000000000000000000000000aa";
pub const OTHER_ADDRESS: &str = "0x00000000000000000000000000000000000000bb";

/// Indexer response with `badges` essences (ids 1..=n) and `profiles` profiles (ids 1..=n).
pub fn wallet(badges: u64, profiles: u64) -> AddressResponse {
    let essences: Vec<Value> = (1..=badges)
        .map(|i| json!({"node": {"essenceID": i, "tokenURI": format!("ipfs://badge/{i}")}}))
        .collect();
    let profile_edges: Vec<Value> = (1..=profiles)
        .map(|i| json!({"node": {"profileID": i, "handle": format!("user{i}.cc"), "isPrimary": i == 1}}))
        .collect();
    serde_json::from_value(json!({
        "address": {"wallet": {
            "primaryProfile": {
                "profileID": 1,
                "handle": "user1.cc",
                "essences": {"totalCount": badges, "edges": essences}
            },
            "profiles": {"edges": profile_edges}
        }}
    }))
    .expect("wallet fixture")
}

#[derive(Clone)]
pub enum Step {
    Respond(AddressResponse),
    Fail(String),
    /// Never resolves; counted in `aborted` when the fetch is dropped.
    Hang,
}

struct AbortGuard(Arc<AtomicUsize>);

impl Drop for AbortGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Plays `script` in order, then repeats `fallback`.
pub struct ScriptedIndexer {
    script: Mutex<VecDeque<Step>>,
    fallback: Mutex<Step>,
    fetches: AtomicUsize,
    aborted: Arc<AtomicUsize>,
    queries: Mutex<Vec<(AddressQuery, String)>>,
    pub started: Notify,
}

impl ScriptedIndexer {
    pub fn new(fallback: Step) -> Arc<Self> {
        Self::with_script(Vec::new(), fallback)
    }

    pub fn with_script(script: Vec<Step>, fallback: Step) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: Mutex::new(fallback),
            fetches: AtomicUsize::new(0),
            aborted: Arc::new(AtomicUsize::new(0)),
            queries: Mutex::new(Vec::new()),
            started: Notify::new(),
        })
    }

    pub fn set_fallback(&self, step: Step) {
        *self.fallback.lock().unwrap() = step;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn aborted(&self) -> usize {
        self.aborted.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<(AddressQuery, String)> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ProfileIndexer for ScriptedIndexer {
    async fn fetch_wallet(&self, query: &AddressQuery, access_token: &str) -> SessionResult<AddressResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push((query.clone(), access_token.to_string()));
        let step = {
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.fallback.lock().unwrap().clone())
        };
        self.started.notify_one();
        match step {
            Step::Respond(response) => Ok(response),
            Step::Fail(message) => Err(SessionError::Indexer(message)),
            Step::Hang => {
                let _guard = AbortGuard(self.aborted.clone());
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

/// Wallet reporting a fixed chain. Switch/add answers are configurable.
pub struct FakeWallet {
    chain_id: u64,
    network_error: Option<ProviderError>,
    delay: Duration,
    switch_error: Option<ProviderError>,
    add_error: Option<ProviderError>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeWallet {
    pub fn on_chain(chain_id: u64) -> Self {
        Self {
            chain_id,
            network_error: None,
            delay: Duration::ZERO,
            switch_error: None,
            add_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn network_fails(mut self, error: ProviderError) -> Self {
        self.network_error = Some(error);
        self
    }

    /// Every request waits `delay` before answering.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn switch_fails(mut self, error: ProviderError) -> Self {
        self.switch_error = Some(error);
        self
    }

    pub fn add_fails(mut self, error: ProviderError) -> Self {
        self.add_error = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(m, _)| m).collect()
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn get_network(&self) -> Result<Network, ProviderError> {
        tokio::time::sleep(self.delay).await;
        match &self.network_error {
            Some(e) => Err(e.clone()),
            None => Ok(Network::new(self.chain_id)),
        }
    }

    async fn send(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        tokio::time::sleep(self.delay).await;
        self.calls.lock().unwrap().push((method.to_string(), params));
        let error = match method {
            methods::SWITCH_CHAIN => self.switch_error.clone(),
            methods::ADD_CHAIN => self.add_error.clone(),
            _ => None,
        };
        match error {
            Some(e) => Err(e),
            None => Ok(Value::Null),
        }
    }
}
