//! Session - wallet connection, access token and indexed profile data
//!
//! `SessionController` owns the state and is the only writer besides the poll
//! task it spawns. Changing a trigger input (address, token, counts, creation
//! flags) cancels the running poll and starts a new one.
//!
//! ```text
//! set_address / set_access_token / set_*_count / set_creating_*
//!     │  generation += 1
//!     ├── cancel previous poll (its query aborts once)
//!     └── spawn run_poll(generation)  when address and token are both set
//!
//! set_provider / set_address
//!     └── spawn check_network()       when provider and address are both set
//!             └── Switched | Added ─▶ reset()
//! ```

mod config;
mod events;
mod state;

pub use config::{ChainConfig, PollConfig, SessionConfig};
pub use events::SessionEvent;
pub use state::{SessionSnapshot, SessionState};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tracing::Instrument;

use crate::core::{normalize_address, Badge, Profile, SessionError, SessionResult};
use crate::indexer::{AddressQuery, GraphQlIndexer, ProfileIndexer};
use crate::network::{verify_network, NetworkCheck, WalletProvider};
use crate::poller::{run_poll, PollContext, PollOutcome};
use crate::runtime::CancelToken;

pub struct SessionController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: SessionConfig,
    indexer: Arc<dyn ProfileIndexer>,
    state: Arc<Mutex<SessionState>>,
    poll: Mutex<Option<ActivePoll>>,
    events: broadcast::Sender<SessionEvent>,
    /// Token of the background network check, replaced on every provider/address change.
    network_check: Mutex<Option<CancelToken>>,
    closed: AtomicBool,
}

struct ActivePoll {
    cancel: CancelToken,
    outcome: watch::Receiver<Option<PollOutcome>>,
}

impl SessionController {
    pub fn new(config: SessionConfig, indexer: Arc<dyn ProfileIndexer>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let inner = ControllerInner {
            config,
            indexer,
            state: Arc::new(Mutex::new(SessionState::default())),
            poll: Mutex::new(None),
            events,
            network_check: Mutex::new(None),
            closed: AtomicBool::new(false),
        };
        Self { inner: Arc::new(inner) }
    }

    /// Controller backed by the GraphQL indexer at `config.indexer_url`.
    pub fn from_config(config: SessionConfig) -> SessionResult<Self> {
        let mut indexer = GraphQlIndexer::new(config.indexer_url.clone())?;
        if let Some(key) = &config.api_key {
            indexer = indexer.with_api_key(key.clone());
        }
        Ok(Self::new(config, Arc::new(indexer)))
    }

    /// Attach a provider before any address is known. No network check runs.
    pub fn with_provider(self, provider: Arc<dyn WalletProvider>) -> Self {
        if let Ok(mut state) = self.inner.state.lock() {
            state.provider = Some(provider);
        }
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    // Reads

    pub fn provider(&self) -> Option<Arc<dyn WalletProvider>> {
        self.read(|s| s.provider.clone())
    }
    pub fn address(&self) -> Option<String> {
        self.read(|s| s.address.clone())
    }
    pub fn access_token(&self) -> Option<String> {
        self.read(|s| s.access_token.clone())
    }
    pub fn primary_profile_id(&self) -> Option<u64> {
        self.read(|s| s.primary_profile_id)
    }
    pub fn primary_handle(&self) -> Option<String> {
        self.read(|s| s.primary_handle.clone())
    }
    pub fn profile_count(&self) -> usize {
        self.read(|s| s.profile_count)
    }
    pub fn badge_count(&self) -> usize {
        self.read(|s| s.badge_count)
    }
    pub fn badges(&self) -> Vec<Badge> {
        self.read(|s| s.badges.clone())
    }
    pub fn profiles(&self) -> Vec<Profile> {
        self.read(|s| s.profiles.clone())
    }
    pub fn is_creating_profile(&self) -> bool {
        self.read(|s| s.is_creating_profile)
    }
    pub fn is_creating_badge(&self) -> bool {
        self.read(|s| s.is_creating_badge)
    }
    pub fn network(&self) -> Option<NetworkCheck> {
        self.read(|s| s.network)
    }

    pub fn snapshot(&self) -> SessionResult<SessionSnapshot> {
        let state = self.inner.state.lock().map_err(|_| SessionError::Lock)?;
        Ok(state.snapshot())
    }

    fn read<T: Default>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        self.inner.state.lock().map(|s| f(&s)).unwrap_or_default()
    }

    // Connection

    pub fn set_provider(&self, provider: Option<Arc<dyn WalletProvider>>) -> SessionResult<()> {
        let changed = self.inner.update(|state| {
            let same = match (&state.provider, &provider) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if same {
                return false;
            }
            state.provider = provider;
            state.network = None;
            true
        })?;
        if changed {
            self.spawn_network_check();
        }
        Ok(())
    }

    /// Accepts `0x` followed by 40 hex characters; stored lower-cased.
    pub fn set_address(&self, address: Option<&str>) -> SessionResult<()> {
        let address = address.map(normalize_address).transpose()?;
        let changed = self.inner.update_trigger(|state| {
            if state.address == address {
                return false;
            }
            state.address = address;
            true
        })?;
        if changed {
            self.spawn_network_check();
        }
        Ok(())
    }

    pub fn set_access_token(&self, token: Option<&str>) -> SessionResult<()> {
        let token = token.map(str::to_string);
        self.inner.update_trigger(|state| replace(&mut state.access_token, token))?;
        Ok(())
    }

    // Indexed data

    pub fn set_primary_profile_id(&self, id: Option<u64>) -> SessionResult<()> {
        self.inner.update(|state| replace(&mut state.primary_profile_id, id))?;
        Ok(())
    }
    pub fn set_primary_handle(&self, handle: Option<&str>) -> SessionResult<()> {
        let handle = handle.map(str::to_string);
        self.inner.update(|state| replace(&mut state.primary_handle, handle))?;
        Ok(())
    }
    pub fn set_badges(&self, badges: Vec<Badge>) -> SessionResult<()> {
        self.inner.update(|state| replace(&mut state.badges, badges))?;
        Ok(())
    }
    pub fn set_profiles(&self, profiles: Vec<Profile>) -> SessionResult<()> {
        self.inner.update(|state| replace(&mut state.profiles, profiles))?;
        Ok(())
    }
    pub fn set_profile_count(&self, count: usize) -> SessionResult<()> {
        self.inner.update_trigger(|state| replace(&mut state.profile_count, count))?;
        Ok(())
    }
    pub fn set_badge_count(&self, count: usize) -> SessionResult<()> {
        self.inner.update_trigger(|state| replace(&mut state.badge_count, count))?;
        Ok(())
    }
    pub fn set_creating_profile(&self, creating: bool) -> SessionResult<()> {
        self.inner.update_trigger(|state| replace(&mut state.is_creating_profile, creating))?;
        Ok(())
    }
    pub fn set_creating_badge(&self, creating: bool) -> SessionResult<()> {
        self.inner.update_trigger(|state| replace(&mut state.is_creating_badge, creating))?;
        Ok(())
    }

    /// Call once the profile mint transaction is confirmed.
    pub fn begin_profile_creation(&self) -> SessionResult<()> {
        self.set_creating_profile(true)
    }
    pub fn begin_badge_creation(&self) -> SessionResult<()> {
        self.set_creating_badge(true)
    }

    // Lifecycle

    /// Verify the wallet chain. A switch or add resets the session.
    ///
    /// If the provider is replaced while the check runs, the result is returned
    /// but not applied.
    pub async fn check_network(&self) -> SessionResult<NetworkCheck> {
        let provider = self.provider().ok_or(SessionError::NoProvider)?;
        let result = verify_network(provider.as_ref(), &self.inner.config.chain).await;
        if !self.inner.is_current(&provider) {
            tracing::debug!("provider changed during network check, result dropped");
            return result;
        }
        self.inner.record_network(result)
    }

    /// Clear everything read from the indexer and fetch again.
    pub fn reset(&self) -> SessionResult<()> {
        self.inner.reset()
    }

    /// Cancel the running poll. No poll starts afterwards.
    pub fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.cancel_poll();
        tracing::info!("session shut down");
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Wait for the current poll to finish. `None` when no poll is running
    /// or it was torn down before reporting.
    pub async fn wait_idle(&self) -> Option<PollOutcome> {
        let mut outcome = {
            let poll = self.inner.poll.lock().ok()?;
            poll.as_ref()?.outcome.clone()
        };
        let finished = match outcome.wait_for(Option::is_some).await {
            Ok(done) => (*done).clone(),
            Err(_) => None,
        };
        finished
    }

    /// Replace the background network check. The previous one is cancelled
    /// even when no new check starts.
    fn spawn_network_check(&self) {
        let Ok(mut slot) = self.inner.network_check.lock() else {
            return;
        };
        if let Some(previous) = slot.take() {
            previous.cancel();
        }

        let Some(provider) = self.read(|s| if s.address.is_some() { s.provider.clone() } else { None }) else {
            return;
        };
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no tokio runtime, network check skipped");
            return;
        };
        let cancel = CancelToken::new();
        *slot = Some(cancel.clone());
        drop(slot);

        let inner = Arc::downgrade(&self.inner);
        let chain = self.inner.config.chain.clone();
        runtime.spawn(async move {
            let result = tokio::select! {
                result = verify_network(provider.as_ref(), &chain) => result,
                _ = cancel.cancelled() => {
                    tracing::debug!("network check superseded");
                    return;
                }
            };
            let Some(inner) = inner.upgrade() else { return };
            if cancel.is_cancelled() || !inner.is_current(&provider) {
                tracing::debug!("network check superseded");
                return;
            }
            let _ = inner.record_network(result);
        });
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl ControllerInner {
    fn emit(&self, event: SessionEvent) {
        tracing::trace!(event = event.name(), "session event");
        let _ = self.events.send(event);
    }

    /// Mutate state without touching the poll. Returns whether `f` changed anything.
    fn update(&self, f: impl FnOnce(&mut SessionState) -> bool) -> SessionResult<bool> {
        let snapshot = {
            let mut state = self.state.lock().map_err(|_| SessionError::Lock)?;
            if !f(&mut state) {
                return Ok(false);
            }
            state.snapshot()
        };
        self.emit(SessionEvent::Updated(snapshot));
        Ok(true)
    }

    /// Mutate a poll input. On change the running poll is replaced.
    fn update_trigger(&self, f: impl FnOnce(&mut SessionState) -> bool) -> SessionResult<bool> {
        let mut poll = self.poll.lock().map_err(|_| SessionError::Lock)?;
        let (snapshot, generation, address, token) = {
            let mut state = self.state.lock().map_err(|_| SessionError::Lock)?;
            if !f(&mut state) {
                return Ok(false);
            }
            state.generation += 1;
            (state.snapshot(), state.generation, state.address.clone(), state.access_token.clone())
        };

        if let Some(previous) = poll.take() {
            previous.cancel.cancel();
        }
        *poll = match (address, token) {
            (Some(address), Some(token)) => self.start_poll(generation, address, token),
            _ => None,
        };
        drop(poll);

        self.emit(SessionEvent::Updated(snapshot));
        Ok(true)
    }

    fn start_poll(&self, generation: u64, address: String, access_token: String) -> Option<ActivePoll> {
        if self.closed.load(Ordering::SeqCst) {
            return None;
        }
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(generation, "no tokio runtime, poll not started");
            return None;
        };

        let cancel = CancelToken::new();
        let (done, outcome) = watch::channel(None);
        let ctx = PollContext {
            state: self.state.clone(),
            indexer: self.indexer.clone(),
            query: AddressQuery { address, chain_id: self.config.chain.chain_id },
            access_token,
            config: self.config.poll,
            cancel: cancel.clone(),
            generation,
            events: self.events.clone(),
        };
        let events = self.events.clone();
        let span = tracing::info_span!("poll", generation);
        runtime.spawn(
            async move {
                let outcome = run_poll(ctx).await;
                tracing::debug!(?outcome, "poll finished");
                let _ = events.send(SessionEvent::PollFinished(outcome.clone()));
                let _ = done.send(Some(outcome));
            }
            .instrument(span),
        );
        Some(ActivePoll { cancel, outcome })
    }

    fn cancel_poll(&self) {
        let active = match self.poll.lock() {
            Ok(mut poll) => poll.take(),
            Err(_) => None,
        };
        if let Some(active) = active {
            active.cancel.cancel();
        }
    }

    fn reset(&self) -> SessionResult<()> {
        self.update_trigger(|state| {
            state.clear_derived();
            true
        })?;
        tracing::info!("session reset");
        self.emit(SessionEvent::Reset);
        Ok(())
    }

    /// Whether `provider` is still the connected wallet and an address is set.
    fn is_current(&self, provider: &Arc<dyn WalletProvider>) -> bool {
        self.state
            .lock()
            .map(|s| s.address.is_some() && s.provider.as_ref().is_some_and(|p| Arc::ptr_eq(p, provider)))
            .unwrap_or(false)
    }

    fn record_network(&self, result: SessionResult<NetworkCheck>) -> SessionResult<NetworkCheck> {
        match result {
            Ok(check) => {
                self.update(|state| replace(&mut state.network, Some(check)))?;
                self.emit(SessionEvent::NetworkChecked(check));
                if check.requires_reset() {
                    self.reset()?;
                }
                Ok(check)
            }
            Err(e) => {
                tracing::error!(error = %e, "network check failed");
                self.emit(SessionEvent::NetworkError { message: e.to_string() });
                Err(e)
            }
        }
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        if let Ok(poll) = self.poll.get_mut() {
            if let Some(active) = poll.take() {
                active.cancel.cancel();
            }
        }
        if let Ok(check) = self.network_check.get_mut() {
            if let Some(cancel) = check.take() {
                cancel.cancel();
            }
        }
    }
}
