//! Poller - fetch wallet data and reconcile it with pending creations
//!
//! The indexer lags the chain. After a profile or badge is minted the UI sets a
//! creation flag and the poller keeps fetching until the new item shows up.
//!
//! ```text
//! loop
//!   fetch ──err──▶ clear flags ─────────────────────────▶ Failed
//!     │
//!     ▼
//!   reconcile
//!     ├── Replaced / BadgeAppended / ProfileAppended
//!     │     ├── other creation still pending ─▶ loop (budget reset)
//!     │     └── otherwise ───────────────────────────────▶ Updated
//!     └── NotYetIndexed
//!           ├── attempts < max ─▶ sleep(interval) ─▶ loop
//!           └── otherwise ─▶ cancel query, clear flags ─▶ Exhausted
//!
//! cancel token fired at any await ──────────────────────▶ Cancelled
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::core::{SessionError, SessionResult};
use crate::indexer::{AddressQuery, ProfileIndexer, QueryHandle, WalletSnapshot};
use crate::runtime::CancelToken;
use crate::session::{PollConfig, SessionEvent, SessionState};

/// What one fetch did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    Replaced,
    BadgeAppended,
    ProfileAppended,
    NotYetIndexed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    Updated { reconciliation: Reconciliation, attempts: u32 },
    Exhausted { attempts: u32 },
    Failed { message: String },
    Cancelled,
}

/// Apply a fresh fetch to the state.
///
/// Without a pending creation the snapshot replaces everything. With one, the
/// badge count is checked first and the profile count only when badges are
/// unchanged, so at most one new item lands per fetch. A count increase whose
/// newest item is missing from the response is a resync (`Replaced`), never an
/// append.
pub fn reconcile(state: &mut SessionState, snapshot: WalletSnapshot) -> Reconciliation {
    if !state.is_creating() {
        state.replace_with(snapshot);
        return Reconciliation::Replaced;
    }

    let badge_count = snapshot.badge_count();
    let profile_count = snapshot.profile_count();

    if badge_count > state.badge_count {
        state.is_creating_badge = false;
        // The newest badge sits past the fetched page: take the page as it is.
        let Some(badge) = snapshot.newest_badge.clone() else {
            state.replace_with(snapshot);
            return Reconciliation::Replaced;
        };
        state.badges.push(badge);
        state.badge_count = badge_count;
        return Reconciliation::BadgeAppended;
    }
    if badge_count == state.badge_count && profile_count > state.profile_count {
        state.is_creating_profile = false;
        let Some(profile) = snapshot.newest_profile().cloned() else {
            state.replace_with(snapshot);
            return Reconciliation::Replaced;
        };
        state.profiles.push(profile);
        state.profile_count = profile_count;
        return Reconciliation::ProfileAppended;
    }
    if badge_count < state.badge_count || profile_count < state.profile_count {
        // Something was removed out of band; trust the indexer.
        state.replace_with(snapshot);
        state.clear_creation_flags();
        return Reconciliation::Replaced;
    }
    Reconciliation::NotYetIndexed
}

/// Everything one poll run needs. Built by the controller per trigger.
pub struct PollContext {
    pub state: Arc<Mutex<SessionState>>,
    pub indexer: Arc<dyn ProfileIndexer>,
    pub query: AddressQuery,
    pub access_token: String,
    pub config: PollConfig,
    pub cancel: CancelToken,
    pub generation: u64,
    pub events: broadcast::Sender<SessionEvent>,
}

impl PollContext {
    /// Run `f` against the state if this poll is still current.
    fn apply<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> SessionResult<Option<T>> {
        let (out, snapshot) = {
            let mut state = self.state.lock().map_err(|_| SessionError::Lock)?;
            if state.generation != self.generation || self.cancel.is_cancelled() {
                return Ok(None);
            }
            let out = f(&mut state);
            (out, state.snapshot())
        };
        let _ = self.events.send(SessionEvent::Updated(snapshot));
        Ok(Some(out))
    }

    fn clear_flags(&self) {
        if let Err(e) = self.apply(|state| state.clear_creation_flags()) {
            tracing::error!(error = %e, "clearing creation flags");
        }
    }
}

pub async fn run_poll(ctx: PollContext) -> PollOutcome {
    let mut attempts: u32 = 0;

    loop {
        if ctx.cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        let mut query = QueryHandle::spawn(ctx.indexer.clone(), ctx.query.clone(), ctx.access_token.clone());
        let result = tokio::select! {
            result = query.wait() => result,
            _ = ctx.cancel.cancelled() => {
                query.cancel();
                tracing::debug!(address = %ctx.query.address, "poll cancelled with query in flight");
                return PollOutcome::Cancelled;
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(SessionError::Cancelled) => return PollOutcome::Cancelled,
            Err(e) => {
                tracing::error!(address = %ctx.query.address, error = %e, "fetching wallet data failed");
                ctx.clear_flags();
                return PollOutcome::Failed { message: e.to_string() };
            }
        };

        let snapshot = response.snapshot();
        let reconciliation = match ctx.apply(|state| {
            let r = reconcile(state, snapshot);
            if r != Reconciliation::NotYetIndexed {
                state.last_synced_at = Some(Utc::now());
            }
            r
        }) {
            Ok(Some(r)) => r,
            Ok(None) => return PollOutcome::Cancelled,
            Err(e) => return PollOutcome::Failed { message: e.to_string() },
        };

        match reconciliation {
            Reconciliation::NotYetIndexed if attempts < ctx.config.max_attempts => {
                attempts += 1;
                tracing::debug!(attempt = attempts, max = ctx.config.max_attempts, "not indexed yet, fetching again");
                if ctx.cancel.is_cancelled() {
                    return PollOutcome::Cancelled;
                }
                tokio::select! {
                    _ = tokio::time::sleep(ctx.config.interval) => {}
                    _ = ctx.cancel.cancelled() => return PollOutcome::Cancelled,
                }
            }
            Reconciliation::NotYetIndexed => {
                query.cancel();
                tracing::info!(attempts, "indexer never caught up, giving up");
                ctx.clear_flags();
                return PollOutcome::Exhausted { attempts };
            }
            reconciliation => {
                match reconciliation {
                    Reconciliation::BadgeAppended => tracing::info!("new badge indexed"),
                    Reconciliation::ProfileAppended => tracing::info!("new profile indexed"),
                    _ => tracing::debug!("wallet data refreshed"),
                }
                // The other creation is still pending: fetch again right away with a fresh budget.
                let pending = ctx.state.lock().map(|s| s.is_creating()).unwrap_or(false);
                if pending && !ctx.cancel.is_cancelled() {
                    attempts = 0;
                    continue;
                }
                return PollOutcome::Updated { reconciliation, attempts };
            }
        }
    }
}
